//! The five 5R workplace-discipline categories and a fixed mapping over them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One of the five 5R categories, always handled in declaration order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Ringkas,
    Rapi,
    Resik,
    Rawat,
    Rajin,
}

impl Category {
    /// Every category in submission order.
    pub const ALL: [Category; 5] = [
        Category::Ringkas,
        Category::Rapi,
        Category::Resik,
        Category::Rawat,
        Category::Rajin,
    ];

    /// Lower-case key used in storage paths, column names, and JSON.
    pub fn key(self) -> &'static str {
        match self {
            Self::Ringkas => "ringkas",
            Self::Rapi => "rapi",
            Self::Resik => "resik",
            Self::Rawat => "rawat",
            Self::Rajin => "rajin",
        }
    }

    /// Title-case label shown to people.
    pub fn label(self) -> &'static str {
        match self {
            Self::Ringkas => "Ringkas",
            Self::Rapi => "Rapi",
            Self::Resik => "Resik",
            Self::Rawat => "Rawat",
            Self::Rajin => "Rajin",
        }
    }

    /// Short explanation of what the category asks for.
    pub fn description(self) -> &'static str {
        match self {
            Self::Ringkas => "Memilah dan membuang yang tidak perlu",
            Self::Rapi => "Menyusun dengan teratur",
            Self::Resik => "Membersihkan area kerja",
            Self::Rawat => "Merawat kondisi optimal",
            Self::Rajin => "Membiasakan disiplin",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Returned when a string names no category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.key() == s)
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

/// Which half of a before/after pair a photo fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PhotoSide {
    Before,
    After,
}

impl PhotoSide {
    /// Both sides in upload order.
    pub const ALL: [PhotoSide; 2] = [PhotoSide::Before, PhotoSide::After];

    pub fn key(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
        }
    }
}

impl fmt::Display for PhotoSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A before/after pair of anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoPair<T> {
    pub before: T,
    pub after: T,
}

impl<T> PhotoPair<T> {
    pub fn get(&self, side: PhotoSide) -> &T {
        match side {
            PhotoSide::Before => &self.before,
            PhotoSide::After => &self.after,
        }
    }

    pub fn get_mut(&mut self, side: PhotoSide) -> &mut T {
        match side {
            PhotoSide::Before => &mut self.before,
            PhotoSide::After => &mut self.after,
        }
    }

    /// Consume the pair, before first.
    pub fn into_entries(self) -> [(PhotoSide, T); 2] {
        [(PhotoSide::Before, self.before), (PhotoSide::After, self.after)]
    }
}

/// One value per category, addressed by [`Category`] instead of by name.
///
/// Serialises as a JSON object keyed by category in fixed order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoSet<T> {
    ringkas: T,
    rapi: T,
    resik: T,
    rawat: T,
    rajin: T,
}

impl<T> PhotoSet<T> {
    /// Build a set by calling `f` once per category, in order.
    pub fn from_fn(mut f: impl FnMut(Category) -> T) -> Self {
        Self {
            ringkas: f(Category::Ringkas),
            rapi: f(Category::Rapi),
            resik: f(Category::Resik),
            rawat: f(Category::Rawat),
            rajin: f(Category::Rajin),
        }
    }

    /// Fallible variant of [`PhotoSet::from_fn`]; stops at the first error.
    pub fn try_from_fn<E>(mut f: impl FnMut(Category) -> Result<T, E>) -> Result<Self, E> {
        Ok(Self {
            ringkas: f(Category::Ringkas)?,
            rapi: f(Category::Rapi)?,
            resik: f(Category::Resik)?,
            rawat: f(Category::Rawat)?,
            rajin: f(Category::Rajin)?,
        })
    }

    pub fn get(&self, category: Category) -> &T {
        match category {
            Category::Ringkas => &self.ringkas,
            Category::Rapi => &self.rapi,
            Category::Resik => &self.resik,
            Category::Rawat => &self.rawat,
            Category::Rajin => &self.rajin,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut T {
        match category {
            Category::Ringkas => &mut self.ringkas,
            Category::Rapi => &mut self.rapi,
            Category::Resik => &mut self.resik,
            Category::Rawat => &mut self.rawat,
            Category::Rajin => &mut self.rajin,
        }
    }

    /// Iterate `(category, value)` in category order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &T)> {
        Category::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }

    /// Consume the set in category order.
    pub fn into_entries(self) -> [(Category, T); 5] {
        [
            (Category::Ringkas, self.ringkas),
            (Category::Rapi, self.rapi),
            (Category::Resik, self.resik),
            (Category::Rawat, self.rawat),
            (Category::Rajin, self.rajin),
        ]
    }

    /// Transform every value, keeping the category mapping.
    pub fn map<U>(self, mut f: impl FnMut(Category, T) -> U) -> PhotoSet<U> {
        PhotoSet {
            ringkas: f(Category::Ringkas, self.ringkas),
            rapi: f(Category::Rapi, self.rapi),
            resik: f(Category::Resik, self.resik),
            rawat: f(Category::Rawat, self.rawat),
            rajin: f(Category::Rajin, self.rajin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn categories_follow_fixed_order() {
        let keys: Vec<_> = Category::ALL.into_iter().map(Category::key).collect();
        assert_eq!(keys, ["ringkas", "rapi", "resik", "rawat", "rajin"]);
    }

    #[rstest]
    #[case("ringkas", Ok(Category::Ringkas))]
    #[case("rajin", Ok(Category::Rajin))]
    #[case("Rapi", Err(UnknownCategory("Rapi".to_owned())))]
    fn parse_category(#[case] input: &str, #[case] expected: Result<Category, UnknownCategory>) {
        assert_eq!(input.parse::<Category>(), expected);
    }

    #[rstest]
    fn photo_set_iterates_in_category_order() {
        let set = PhotoSet::from_fn(Category::label);
        let labels: Vec<_> = set.iter().map(|(_, label)| *label).collect();
        assert_eq!(labels, ["Ringkas", "Rapi", "Resik", "Rawat", "Rajin"]);
    }

    #[rstest]
    fn photo_set_get_mut_targets_one_category() {
        let mut set = PhotoSet::<u8>::default();
        *set.get_mut(Category::Resik) = 7;
        assert_eq!(*set.get(Category::Resik), 7);
        assert_eq!(set.iter().filter(|(_, value)| **value != 0).count(), 1);
    }

    #[rstest]
    fn photo_set_serialises_as_keyed_object() {
        let set = PhotoSet::from_fn(|category| PhotoPair {
            before: format!("{}_before", category.key()),
            after: format!("{}_after", category.key()),
        });
        let value = serde_json::to_value(&set).expect("serialise set");
        assert_eq!(value["rawat"]["after"], "rawat_after");
        assert_eq!(value.as_object().map(|map| map.len()), Some(5));
    }

    #[rstest]
    fn try_from_fn_stops_at_first_error() {
        let mut visited = Vec::new();
        let result: Result<PhotoSet<()>, Category> = PhotoSet::try_from_fn(|category| {
            visited.push(category);
            if category == Category::Resik {
                Err(category)
            } else {
                Ok(())
            }
        });
        assert_eq!(result, Err(Category::Resik));
        assert_eq!(visited, [Category::Ringkas, Category::Rapi, Category::Resik]);
    }
}
