//! Testimony clip descriptors.

use serde::{Deserialize, Serialize};

use super::layout::DeviceClass;

/// One clip of the carousel.  Supplied by configuration and never changed
/// while the controller runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoDescriptor {
    pub id: String,
    pub media_url: String,
    /// Portrait cut served to mobile layouts, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_media_url: Option<String>,
    pub caption: String,
    pub author_name: String,
    /// Scatter position on the wall view, percent of the section width.
    #[serde(default)]
    pub display_x: f64,
    /// Scatter position on the wall view, percent of the section height.
    #[serde(default)]
    pub display_y: f64,
}

impl VideoDescriptor {
    pub fn media_url_for(&self, device: DeviceClass) -> &str {
        match (device, &self.mobile_media_url) {
            (DeviceClass::Mobile, Some(url)) => url,
            _ => &self.media_url,
        }
    }

    /// "from <author>", unless the author is just the caption again.
    pub fn byline(&self) -> Option<String> {
        let author = self.author_name.trim();
        (!author.is_empty() && !author.eq_ignore_ascii_case(self.caption.trim()))
            .then(|| format!("from {author}"))
    }
}

fn clip(
    id: &str,
    file: &str,
    mobile_file: Option<&str>,
    caption: &str,
    (display_x, display_y): (f64, f64),
) -> VideoDescriptor {
    VideoDescriptor {
        id: id.to_string(),
        media_url: format!("media/wishes/{file}"),
        mobile_media_url: mobile_file.map(|f| format!("media/wishes/{f}")),
        caption: caption.to_string(),
        author_name: caption.to_string(),
        display_x,
        display_y,
    }
}

/// The seven clips of the Wishes section.
pub fn default_videos() -> Vec<VideoDescriptor> {
    vec![
        clip("wife-upgrade", "wife.mp4", None, "Wife", (15.0, 20.0)),
        clip("wife-kids", "wife-and-kids.mp4", None, "Wife & Kids", (85.0, 25.0)),
        clip("brother", "brother-wide.mp4", Some("brother.mp4"), "Brother", (85.0, 25.0)),
        clip("sister", "sister-wide.mp4", Some("sister.mp4"), "Sister", (60.0, 40.0)),
        clip("tb1", "tb1.mov", None, "TB1", (10.0, 75.0)),
        clip("protek", "protek.mp4", None, "Protek", (75.0, 10.0)),
        clip("peddygree", "peddygree.mov", None, "Peddygree", (30.0, 50.0)),
    ]
}
