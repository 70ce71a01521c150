use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Image attached to a detection: a link to externally hosted media or the
/// encoded frame itself.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImagePayload {
    Reference {
        url: String,
    },
    Inline {
        /// Base64 text exactly as uploaded
        data: String,
    },
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStatus {
    #[default]
    Detected,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    /// Strictly increasing identifier derived from the capture time
    pub id: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub captured_at: OffsetDateTime,
    pub image: Option<ImagePayload>,
    pub description: String,
    /// Detector confidence in `0..=1`
    pub confidence: f64,
    pub status: DetectionStatus,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddDetectionRequest {
    #[serde(default, alias = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(default, alias = "imageBase64")]
    pub image_base64: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl AddDetectionRequest {
    /// The URL wins when a client sends both forms; blank strings count as
    /// absent.
    pub fn image(&self) -> Option<ImagePayload> {
        let non_blank = |s: &Option<String>| s.as_ref().filter(|v| !v.trim().is_empty()).cloned();

        non_blank(&self.image_url)
            .map(|url| ImagePayload::Reference { url })
            .or_else(|| non_blank(&self.image_base64).map(|data| ImagePayload::Inline { data }))
    }
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddDetectionResponse {
    pub success: bool,
    pub detection: DetectionRecord,
}

/// One of the three retained days.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DaySlot {
    Today,
    Yesterday,
    DayBefore,
}

impl DaySlot {
    pub const ALL: [DaySlot; 3] = [DaySlot::Today, DaySlot::Yesterday, DaySlot::DayBefore];

    /// Maps the dashboard's `day=1|2|3` query onto a slot.
    pub fn from_day(day: u8) -> Option<Self> {
        match day {
            1 => Some(DaySlot::Today),
            2 => Some(DaySlot::Yesterday),
            3 => Some(DaySlot::DayBefore),
            _ => None,
        }
    }

    pub fn day(&self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn index(&self) -> usize {
        match self {
            DaySlot::Today => 0,
            DaySlot::Yesterday => 1,
            DaySlot::DayBefore => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DaySlot::Today => "Today",
            DaySlot::Yesterday => "Yesterday",
            DaySlot::DayBefore => "Day before yesterday",
        }
    }
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionHistoryResponse {
    pub success: bool,
    pub day: u8,
    pub date_label: String,
    pub count: usize,
    pub data: Vec<DetectionRecord>,
}
