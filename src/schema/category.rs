use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed registry of vocabulary categories.
///
/// Each category's snake_case name doubles as its directive key in a
/// request and as the file stem of its vocabulary source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Artform,
    PhotographyStyles,
    DefaultTags,
    BodyTypes,
    Roles,
    Hairstyles,
    AdditionalDetails,
    Clothing,
    Composition,
    Pose,
    Background,
    Place,
    Lighting,
    FaceFeatures,
    EyeColors,
    SkinTone,
    AgeGroup,
    Ethnicity,
    Accessories,
    Expression,
    TattoosScars,
    HairColor,
    BodyMarkings,
    FacialHair,
    MakeupStyles,
    PhotoType,
    Device,
    DigitalArtform,
    Photographer,
    Artist,
}

impl Category {
    pub const ALL: [Category; 30] = [
        Category::Artform,
        Category::PhotographyStyles,
        Category::DefaultTags,
        Category::BodyTypes,
        Category::Roles,
        Category::Hairstyles,
        Category::AdditionalDetails,
        Category::Clothing,
        Category::Composition,
        Category::Pose,
        Category::Background,
        Category::Place,
        Category::Lighting,
        Category::FaceFeatures,
        Category::EyeColors,
        Category::SkinTone,
        Category::AgeGroup,
        Category::Ethnicity,
        Category::Accessories,
        Category::Expression,
        Category::TattoosScars,
        Category::HairColor,
        Category::BodyMarkings,
        Category::FacialHair,
        Category::MakeupStyles,
        Category::PhotoType,
        Category::Device,
        Category::DigitalArtform,
        Category::Photographer,
        Category::Artist,
    ];

    /// The twelve physical-feature categories, in slot order.
    pub const FEATURES: [Category; 12] = [
        Category::FaceFeatures,
        Category::EyeColors,
        Category::SkinTone,
        Category::AgeGroup,
        Category::Ethnicity,
        Category::Accessories,
        Category::Expression,
        Category::TattoosScars,
        Category::HairColor,
        Category::BodyMarkings,
        Category::FacialHair,
        Category::MakeupStyles,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Artform => "artform",
            Category::PhotographyStyles => "photography_styles",
            Category::DefaultTags => "default_tags",
            Category::BodyTypes => "body_types",
            Category::Roles => "roles",
            Category::Hairstyles => "hairstyles",
            Category::AdditionalDetails => "additional_details",
            Category::Clothing => "clothing",
            Category::Composition => "composition",
            Category::Pose => "pose",
            Category::Background => "background",
            Category::Place => "place",
            Category::Lighting => "lighting",
            Category::FaceFeatures => "face_features",
            Category::EyeColors => "eye_colors",
            Category::SkinTone => "skin_tone",
            Category::AgeGroup => "age_group",
            Category::Ethnicity => "ethnicity",
            Category::Accessories => "accessories",
            Category::Expression => "expression",
            Category::TattoosScars => "tattoos_scars",
            Category::HairColor => "hair_color",
            Category::BodyMarkings => "body_markings",
            Category::FacialHair => "facial_hair",
            Category::MakeupStyles => "makeup_styles",
            Category::PhotoType => "photo_type",
            Category::Device => "device",
            Category::DigitalArtform => "digital_artform",
            Category::Photographer => "photographer",
            Category::Artist => "artist",
        }
    }

    pub fn from_name(name: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.name() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::from_name(s).ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
