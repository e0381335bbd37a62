use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use uuid::Uuid;

/// Inference step bounds exposed by the form slider.
pub const NUM_STEPS_RANGE: RangeInclusive<u32> = 30..=100;
/// Guidance scale bounds exposed by the form slider.
pub const GUIDANCE_SCALE_RANGE: RangeInclusive<f32> = 1.0..=20.0;

pub const DEFAULT_NUM_STEPS: u32 = 50;
pub const DEFAULT_GUIDANCE_SCALE: f32 = 7.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "16:9")]
    Widescreen,
    #[serde(rename = "4:3")]
    Standard,
    #[serde(rename = "1:1")]
    Square,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Widescreen => "16:9",
            AspectRatio::Standard => "4:3",
            AspectRatio::Square => "1:1",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackgroundType {
    #[serde(rename = "Solid Color")]
    SolidColor,
    #[serde(rename = "Gradient")]
    Gradient,
    #[serde(rename = "Image")]
    Image,
}

impl BackgroundType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackgroundType::SolidColor => "Solid Color",
            BackgroundType::Gradient => "Gradient",
            BackgroundType::Image => "Image",
        }
    }
}

impl fmt::Display for BackgroundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Design-aesthetic tags selectable on the form. Selection order matters:
/// it is preserved all the way into the composed prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Minimalist,
    Modern,
    Vintage,
    Abstract,
}

impl Style {
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Minimalist => "minimalist",
            Style::Modern => "modern",
            Style::Vintage => "vintage",
            Style::Abstract => "abstract",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_num_steps() -> u32 {
    DEFAULT_NUM_STEPS
}

fn default_guidance_scale() -> f32 {
    DEFAULT_GUIDANCE_SCALE
}

/// Raw form submission as it arrives over the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateLogoRequest {
    pub business_name: String,
    pub description: String,
    pub aspect_ratio: AspectRatio,
    pub background_type: BackgroundType,
    #[serde(default)]
    pub styles: Vec<Style>,
    #[serde(default = "default_num_steps")]
    pub num_steps: u32,
    #[serde(default = "default_guidance_scale")]
    pub guidance_scale: f32,
}

impl GenerateLogoRequest {
    /// Enforce the slider bounds at the input surface. The dispatcher
    /// passes both values through unmodified, so nothing downstream
    /// re-checks or clamps them.
    pub fn check_ranges(&self) -> Result<(), String> {
        if !NUM_STEPS_RANGE.contains(&self.num_steps) {
            return Err(format!(
                "num_steps must be between {} and {}, got {}",
                NUM_STEPS_RANGE.start(),
                NUM_STEPS_RANGE.end(),
                self.num_steps
            ));
        }
        if !GUIDANCE_SCALE_RANGE.contains(&self.guidance_scale) {
            return Err(format!(
                "guidance_scale must be between {} and {}, got {}",
                GUIDANCE_SCALE_RANGE.start(),
                GUIDANCE_SCALE_RANGE.end(),
                self.guidance_scale
            ));
        }
        Ok(())
    }

    /// Build the validated request. Duplicate style selections collapse to
    /// their first occurrence, keeping the order the user picked them in.
    pub fn into_logo_request(self) -> LogoRequest {
        let mut styles = Vec::with_capacity(self.styles.len());
        for style in self.styles {
            if !styles.contains(&style) {
                styles.push(style);
            }
        }
        LogoRequest {
            business_name: self.business_name,
            description: self.description,
            aspect_ratio: self.aspect_ratio,
            background_type: self.background_type,
            styles,
            num_steps: self.num_steps,
            guidance_scale: self.guidance_scale,
        }
    }
}

/// A validated logo request. Constructed only after validation has passed,
/// so business_name, description and styles are known to be non-empty.
#[derive(Debug, Clone, Serialize)]
pub struct LogoRequest {
    pub business_name: String,
    pub description: String,
    pub aspect_ratio: AspectRatio,
    pub background_type: BackgroundType,
    pub styles: Vec<Style>,
    pub num_steps: u32,
    pub guidance_scale: f32,
}

/// One generated image persisted to the output directory.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedArtifact {
    pub id: Uuid,
    pub filename: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}

/// A completed submission kept in memory so the frontend can re-fetch
/// metadata for preview. The output directory itself stays manifest-free.
#[derive(Debug, Clone, Serialize)]
pub struct LogoSubmission {
    pub artifact: GeneratedArtifact,
    pub request: LogoRequest,
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct LogoResponse {
    pub id: Uuid,
    pub filename: String,
    pub prompt: String,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
    pub download_url: String,
}

impl From<&LogoSubmission> for LogoResponse {
    fn from(submission: &LogoSubmission) -> Self {
        LogoResponse {
            id: submission.artifact.id,
            filename: submission.artifact.filename.clone(),
            prompt: submission.prompt.clone(),
            size_bytes: submission.artifact.size_bytes,
            created_at: submission.artifact.created_at,
            download_url: format!("/api/logos/{}/file", submission.artifact.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(num_steps: u32, guidance_scale: f32) -> GenerateLogoRequest {
        GenerateLogoRequest {
            business_name: "Acme".into(),
            description: "a coffee cup".into(),
            aspect_ratio: AspectRatio::Square,
            background_type: BackgroundType::SolidColor,
            styles: vec![Style::Vintage],
            num_steps,
            guidance_scale,
        }
    }

    #[test]
    fn ranges_accept_bounds() {
        assert!(request(30, 1.0).check_ranges().is_ok());
        assert!(request(100, 20.0).check_ranges().is_ok());
        assert!(request(50, 7.5).check_ranges().is_ok());
    }

    #[test]
    fn ranges_reject_out_of_bounds() {
        assert!(request(29, 7.5).check_ranges().is_err());
        assert!(request(101, 7.5).check_ranges().is_err());
        assert!(request(50, 0.5).check_ranges().is_err());
        assert!(request(50, 20.5).check_ranges().is_err());
    }

    #[test]
    fn duplicate_styles_collapse_in_selection_order() {
        let mut req = request(50, 7.5);
        req.styles = vec![Style::Vintage, Style::Vintage, Style::Modern, Style::Vintage];
        let logo = req.into_logo_request();
        assert_eq!(logo.styles, vec![Style::Vintage, Style::Modern]);
    }

    #[test]
    fn enum_labels_match_form_values() {
        assert_eq!(AspectRatio::Square.as_str(), "1:1");
        assert_eq!(BackgroundType::SolidColor.as_str(), "Solid Color");
        assert_eq!(Style::Minimalist.as_str(), "minimalist");
        let parsed: AspectRatio = serde_json::from_str("\"16:9\"").unwrap();
        assert_eq!(parsed, AspectRatio::Widescreen);
        let parsed: Style = serde_json::from_str("\"abstract\"").unwrap();
        assert_eq!(parsed, Style::Abstract);
    }
}
