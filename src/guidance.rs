//! Reference texts shown next to the form.

pub struct Note {
    pub title: &'static str,
    pub content: &'static str,
}

pub const IMPORTANT_NOTES: &[Note] = &[
    Note {
        title: "Allaitement",
        content: "5-6 tétées par jour à la demande, terminer par la tétée si elle complète un repas solide",
    },
    Note {
        title: "Légumes",
        content: "Cuits sans sel, avec 1 c.à.c d'huile végétale (colza, noix, olive) ou beurre",
    },
    Note {
        title: "Viandes/poissons",
        content: "10g (2 c.à.c), éviter abats et charcuterie (sauf jambon cuit découenné)",
    },
    Note {
        title: "Fruits",
        content: "Bien mûrs, crus ou cuits, sans sucre ajouté",
    },
];

pub const RECOMMENDATIONS: &[Note] = &[
    Note {
        title: "Respect de l'appétit",
        content: "Ne jamais forcer à terminer le biberon, l'appétit varie d'un jour à l'autre.",
    },
    Note {
        title: "Variété alimentaire",
        content: "Un seul légume et un seul fruit par jour, en changeant chaque jour.",
    },
    Note {
        title: "Persévérance",
        content: "Un aliment refusé se propose de nouveau un autre jour, sans forcer.",
    },
    Note {
        title: "Quantités",
        content: "Viande/poisson : 10g. La pomme de terre sert de liant pour les légumes fluides.",
    },
];

pub const FORBIDDEN_VEGETABLES: &[&str] = &[
    "Choux",
    "Raves",
    "Navets",
    "Oignons",
    "Vert de poireaux",
    "Céleris",
    "Persil",
    "Salsifis",
    "Cardons",
    "Artichauts",
    "Fenouil",
    "Poivrons",
    "Aubergines",
];

pub const FORBIDDEN_PROTEINS: &[&str] = &[
    "Abats",
    "Charcuterie (sauf jambon cuit découenné)",
    "Poissons : anguille, barbeau, brême, carpe, silure, espadon, marlin, siki, requin, lamproie",
];

pub const OTHER_RESTRICTIONS: &[&str] = &[
    "Œuf peu cuit (attendre 1 an)",
    "Sucre ajouté dans les fruits",
    "Sel dans la préparation des légumes",
    "Jus de fruits (non indispensables)",
];

/// First vegetable to avoid that `text` mentions, case-insensitively.
pub fn mentions_forbidden(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    FORBIDDEN_VEGETABLES
        .iter()
        .copied()
        .find(|food| lowered.contains(&food.to_lowercase()))
}
