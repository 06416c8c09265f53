use crate::day::MealField;

pub const MORNING_OPTIONS: &[&str] = &[
    "210ml eau + 7 mesures lait 2ème âge",
    "210ml eau + 7 mesures lait 2ème âge + 1-2 c.à.s céréales",
];

pub const VEGETABLES: &[&str] = &[
    "Carottes",
    "Haricots verts",
    "Épinards",
    "Courgettes",
    "Blanc de poireaux",
    "Potirons",
    "Betteraves rouges",
    "Brocolis",
    "Tomates",
    "Bettes (limité)",
    "Endives (jeunes, limité)",
    "Petits pois (extra-fins, limité)",
];

pub const PROTEINS: &[&str] = &[
    "10g viande rouge",
    "10g viande blanche",
    "10g jambon cuit découenné",
    "10g poisson maigre",
    "10g poisson gras",
    "10g œuf cuit dur (jaune seulement)",
];

pub const FRUITS: &[&str] = &[
    "Pomme",
    "Poire",
    "Banane",
    "Pêche",
    "Abricot",
    "Compote maison (sans sucre)",
    "Petit pot de fruits",
];

pub const SNACK_OPTIONS: &[&str] = &[
    "Laitage bébé (yaourt, petit suisse) + biscuit + fruits",
    "Laitage bébé seul",
    "Biscuit + fruits",
    "Compote de fruits maison",
];

pub const EVENING_OPTIONS: &[&str] = &[
    "Biberon de 210ml eau + 7 mesures lait 2ème âge + 1-2 c.à.s céréales",
    "Biberon de soupe avec 5 mesures de lait 2ème âge",
    "Purée de légumes + fromage râpé + biberon 120-150ml lait",
    "Petit pot légumes + biberon lait",
];

pub(crate) fn options_for(field: MealField) -> Option<&'static [&'static str]> {
    match field {
        MealField::Morning => Some(MORNING_OPTIONS),
        MealField::Vegetable => Some(VEGETABLES),
        MealField::Protein => Some(PROTEINS),
        MealField::FruitLunch => Some(FRUITS),
        MealField::Snack => Some(SNACK_OPTIONS),
        MealField::Evening => Some(EVENING_OPTIONS),
        MealField::Remarks => None,
    }
}

/// Whether `value` may be stored in `field`. Empty always clears.
pub fn is_allowed(field: MealField, value: &str) -> bool {
    if value.is_empty() {
        return true;
    }
    match options_for(field) {
        Some(list) => list.contains(&value),
        None => true,
    }
}

/// Resolves user input to a catalog entry: exact match, 1-based index, or a
/// unique case-insensitive prefix.
pub fn resolve_option(field: MealField, input: &str) -> Option<String> {
    let input = input.trim();
    let Some(list) = options_for(field) else {
        return Some(input.to_string());
    };
    if input.is_empty() {
        return Some(String::new());
    }
    if list.contains(&input) {
        return Some(input.to_string());
    }
    if let Ok(index) = input.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|i| list.get(i))
            .map(|s| s.to_string());
    }
    let lowered = input.to_lowercase();
    let mut matches = list
        .iter()
        .filter(|option| option.to_lowercase().starts_with(&lowered));
    match (matches.next(), matches.next()) {
        (Some(only), None) => Some(only.to_string()),
        _ => None,
    }
}
