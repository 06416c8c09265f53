use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Weekday slot of a schedule. Serialized with the stored French names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayName {
    #[serde(rename = "Lundi")]
    Monday,
    #[serde(rename = "Mardi")]
    Tuesday,
    #[serde(rename = "Mercredi")]
    Wednesday,
    #[serde(rename = "Jeudi")]
    Thursday,
    #[serde(rename = "Vendredi")]
    Friday,
    #[serde(rename = "Samedi")]
    Saturday,
    #[serde(rename = "Dimanche")]
    Sunday,
}

impl DayName {
    pub const ALL: [DayName; 7] = [
        DayName::Monday,
        DayName::Tuesday,
        DayName::Wednesday,
        DayName::Thursday,
        DayName::Friday,
        DayName::Saturday,
        DayName::Sunday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DayName::Monday => "Lundi",
            DayName::Tuesday => "Mardi",
            DayName::Wednesday => "Mercredi",
            DayName::Thursday => "Jeudi",
            DayName::Friday => "Vendredi",
            DayName::Saturday => "Samedi",
            DayName::Sunday => "Dimanche",
        }
    }

    /// Stored `day_order` column: Monday = 1 … Sunday = 7.
    pub fn order(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn from_order(order: u8) -> Option<Self> {
        match order {
            1..=7 => Some(Self::ALL[usize::from(order) - 1]),
            _ => None,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            DayName::Monday => 0,
            DayName::Tuesday => 1,
            DayName::Wednesday => 2,
            DayName::Thursday => 3,
            DayName::Friday => 4,
            DayName::Saturday => 5,
            DayName::Sunday => 6,
        }
    }
}

impl fmt::Display for DayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownName(pub String);

impl fmt::Display for UnknownName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown name '{}'", self.0)
    }
}

impl std::error::Error for UnknownName {}

impl FromStr for DayName {
    type Err = UnknownName;

    /// Accepts the stored French names and English names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let day = match lowered.as_str() {
            "lundi" | "monday" | "mon" => DayName::Monday,
            "mardi" | "tuesday" | "tue" => DayName::Tuesday,
            "mercredi" | "wednesday" | "wed" => DayName::Wednesday,
            "jeudi" | "thursday" | "thu" => DayName::Thursday,
            "vendredi" | "friday" | "fri" => DayName::Friday,
            "samedi" | "saturday" | "sat" => DayName::Saturday,
            "dimanche" | "sunday" | "sun" => DayName::Sunday,
            _ => return Err(UnknownName(s.to_string())),
        };
        Ok(day)
    }
}

/// Editable slot of a [`DayEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealField {
    Morning,
    Vegetable,
    Protein,
    FruitLunch,
    Snack,
    Evening,
    Remarks,
}

impl MealField {
    pub const ALL: [MealField; 7] = [
        MealField::Morning,
        MealField::Vegetable,
        MealField::Protein,
        MealField::FruitLunch,
        MealField::Snack,
        MealField::Evening,
        MealField::Remarks,
    ];

    /// Column name in the `food_tracker` table.
    pub fn column(self) -> &'static str {
        match self {
            MealField::Morning => "morning",
            MealField::Vegetable => "vegetable",
            MealField::Protein => "protein",
            MealField::FruitLunch => "fruit_lunch",
            MealField::Snack => "snack",
            MealField::Evening => "evening",
            MealField::Remarks => "remarks",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MealField::Morning => "Matin",
            MealField::Vegetable => "Légume",
            MealField::Protein => "Viande/Poisson",
            MealField::FruitLunch => "Fruit",
            MealField::Snack => "Goûter (16h)",
            MealField::Evening => "Soir",
            MealField::Remarks => "Remarques",
        }
    }

    /// Allowed values, or `None` for free text.
    pub fn options(self) -> Option<&'static [&'static str]> {
        crate::options::options_for(self)
    }

    pub fn is_free_text(self) -> bool {
        self.options().is_none()
    }
}

impl fmt::Display for MealField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for MealField {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let field = match lowered.as_str() {
            "morning" | "matin" => MealField::Morning,
            "vegetable" | "legume" | "légume" => MealField::Vegetable,
            "protein" | "viande" => MealField::Protein,
            "fruit_lunch" | "fruit" => MealField::FruitLunch,
            "snack" | "gouter" | "goûter" => MealField::Snack,
            "evening" | "soir" => MealField::Evening,
            "remarks" | "remarques" => MealField::Remarks,
            _ => return Err(UnknownName(s.to_string())),
        };
        Ok(field)
    }
}

/// Meal choices and remarks for one weekday. Unset fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayEntry {
    #[serde(default, deserialize_with = "empty_if_null")]
    pub morning: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub vegetable: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub protein: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub fruit_lunch: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub snack: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub evening: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub remarks: String,
}

impl DayEntry {
    pub fn get(&self, field: MealField) -> &str {
        match field {
            MealField::Morning => &self.morning,
            MealField::Vegetable => &self.vegetable,
            MealField::Protein => &self.protein,
            MealField::FruitLunch => &self.fruit_lunch,
            MealField::Snack => &self.snack,
            MealField::Evening => &self.evening,
            MealField::Remarks => &self.remarks,
        }
    }

    pub fn set(&mut self, field: MealField, value: impl Into<String>) {
        let slot = match field {
            MealField::Morning => &mut self.morning,
            MealField::Vegetable => &mut self.vegetable,
            MealField::Protein => &mut self.protein,
            MealField::FruitLunch => &mut self.fruit_lunch,
            MealField::Snack => &mut self.snack,
            MealField::Evening => &mut self.evening,
            MealField::Remarks => &mut self.remarks,
        };
        *slot = value.into();
    }

    pub fn is_blank(&self) -> bool {
        MealField::ALL
            .iter()
            .all(|field| self.get(*field).trim().is_empty())
    }

    /// Midday parts (vegetable, protein, fruit) that are set, in that order.
    pub fn midday_parts(&self) -> Vec<&str> {
        [&self.vegetable, &self.protein, &self.fruit_lunch]
            .into_iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Stored rows may carry `null` for a never-set column.
fn empty_if_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}
