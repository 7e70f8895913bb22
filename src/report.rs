//! Console report rendering
//!
//! Every line of user-facing output goes through [`ReportWriter`], which writes
//! to any `std::io::Write` so the report can be captured in tests.

use crate::config::Locale;
use crate::models::{AdultInfo, AnalysisResult, DetectedObject, Landmark};
use std::io::{self, Write};
use std::path::Path;

/// Localized strings for one [`Locale`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub url_prompt: &'static str,
    pub analyzing: &'static str,
    pub description: &'static str,
    pub confidence: &'static str,
    pub tags: &'static str,
    pub categories: &'static str,
    pub landmarks: &'static str,
    pub brands: &'static str,
    pub objects: &'static str,
    pub saving_objects: &'static str,
    pub sensitive_content: &'static str,
    pub adult: &'static str,
    pub racy: &'static str,
    pub gory: &'static str,
    pub thumbnail_intro: &'static str,
    pub width_prompt: &'static str,
    pub height_prompt: &'static str,
    pub invalid_input: &'static str,
    pub saving_thumbnail: &'static str,
    pub error_occurred: &'static str,
}

const SWEDISH: Labels = Labels {
    url_prompt: "Klistra in en bildlänk: ",
    analyzing: "Analyserar din bild: ",
    description: "Beskrivning: ",
    confidence: "tillförlitlighet",
    tags: "Taggar:",
    categories: "Kategorier:",
    landmarks: "Landmärken:",
    brands: "Varumärken:",
    objects: "Objekt i bilden:",
    saving_objects: "Sparar bild med objekt i ",
    sensitive_content: "Bedömningar av känsligt innehåll:",
    adult: "Vuxet",
    racy: "Racy",
    gory: "Blodigt",
    thumbnail_intro: "Skapar miniatyrbild. Hur stor vill du att den ska vara?",
    width_prompt: "Bredd: ",
    height_prompt: "Höjd: ",
    invalid_input: "Felaktig inmatning, försök igen.",
    saving_thumbnail: "Sparar miniatyrbild i ",
    error_occurred: "Ett fel inträffade: ",
};

const ENGLISH: Labels = Labels {
    url_prompt: "Paste an image URL: ",
    analyzing: "Analyzing your image: ",
    description: "Description: ",
    confidence: "confidence",
    tags: "Tags:",
    categories: "Categories:",
    landmarks: "Landmarks:",
    brands: "Brands:",
    objects: "Objects in image:",
    saving_objects: "Saving image with objects to ",
    sensitive_content: "Sensitive content ratings:",
    adult: "Adult",
    racy: "Racy",
    gory: "Gory",
    thumbnail_intro: "Creating thumbnail. How large should it be?",
    width_prompt: "Width: ",
    height_prompt: "Height: ",
    invalid_input: "Invalid input, try again.",
    saving_thumbnail: "Saving thumbnail to ",
    error_occurred: "An error occurred: ",
};

impl Labels {
    #[must_use]
    pub fn for_locale(locale: Locale) -> &'static Self {
        match locale {
            Locale::Swedish => &SWEDISH,
            Locale::English => &ENGLISH,
        }
    }
}

/// Format a 0..1 confidence as a percentage with two decimals
#[must_use]
pub fn format_percent(value: f64, locale: Locale) -> String {
    let formatted = format!("{:.2}", value * 100.0);
    match locale {
        Locale::Swedish => format!("{} %", formatted.replace('.', ",")),
        Locale::English => format!("{}%", formatted),
    }
}

fn format_flag(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Writes the human-readable report for one run
pub struct ReportWriter<W: Write> {
    out: W,
    locale: Locale,
    labels: &'static Labels,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W, locale: Locale) -> Self {
        Self {
            out,
            locale,
            labels: Labels::for_locale(locale),
        }
    }

    #[must_use]
    pub fn labels(&self) -> &'static Labels {
        self.labels
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Give back the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Borrow the underlying writer
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.out
    }

    fn scored(&mut self, prefix: &str, name: &str, value: f64) -> io::Result<()> {
        writeln!(
            self.out,
            "{}{} ({}: {})",
            prefix,
            name,
            self.labels.confidence,
            format_percent(value, self.locale)
        )
    }

    /// Write `text` without a newline and flush, for interactive prompts
    pub fn prompt(&mut self, text: &str) -> io::Result<()> {
        write!(self.out, "{}", text)?;
        self.out.flush()
    }

    pub fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text)
    }

    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    pub fn analyzing(&mut self, url: &str) -> io::Result<()> {
        writeln!(self.out, "{}{}", self.labels.analyzing, url)?;
        self.blank()
    }

    /// Every caption, each followed by a blank line
    pub fn captions(&mut self, result: &AnalysisResult) -> io::Result<()> {
        for caption in &result.description.captions {
            self.scored(self.labels.description, &caption.text, caption.confidence)?;
            self.blank()?;
        }
        Ok(())
    }

    /// Tag list, omitted when there are no tags
    pub fn tags(&mut self, result: &AnalysisResult) -> io::Result<()> {
        if result.tags.is_empty() {
            return Ok(());
        }
        self.line(self.labels.tags)?;
        for tag in &result.tags {
            self.scored(" -", &tag.name, tag.confidence)?;
        }
        Ok(())
    }

    /// Category list, always written (header even when empty)
    pub fn categories(&mut self, result: &AnalysisResult) -> io::Result<()> {
        self.line(self.labels.categories)?;
        for category in &result.categories {
            self.scored(" - ", &category.name, category.score)?;
        }
        Ok(())
    }

    /// Deduplicated landmarks, omitted when empty
    pub fn landmarks(&mut self, landmarks: &[&Landmark]) -> io::Result<()> {
        if landmarks.is_empty() {
            return Ok(());
        }
        self.line(self.labels.landmarks)?;
        for landmark in landmarks {
            self.scored(" - ", &landmark.name, landmark.confidence)?;
        }
        Ok(())
    }

    /// Brand list, omitted when there are no brands
    pub fn brands(&mut self, result: &AnalysisResult) -> io::Result<()> {
        if result.brands.is_empty() {
            return Ok(());
        }
        self.line(self.labels.brands)?;
        for brand in &result.brands {
            self.scored(" - ", &brand.name, brand.confidence)?;
        }
        Ok(())
    }

    /// Object list followed by a blank line; callers skip it when empty
    pub fn objects(&mut self, objects: &[DetectedObject]) -> io::Result<()> {
        self.line(self.labels.objects)?;
        for object in objects {
            self.scored(" -", &object.label, object.confidence)?;
        }
        self.blank()
    }

    pub fn objects_saved(&mut self, path: &Path) -> io::Result<()> {
        writeln!(self.out, "{}{}", self.labels.saving_objects, path.display())?;
        self.blank()
    }

    pub fn adult_content(&mut self, adult: &AdultInfo) -> io::Result<()> {
        self.line(self.labels.sensitive_content)?;
        writeln!(self.out, " -{}: {}", self.labels.adult, format_flag(adult.is_adult_content))?;
        writeln!(self.out, " -{}: {}", self.labels.racy, format_flag(adult.is_racy_content))?;
        writeln!(self.out, " -{}: {}", self.labels.gory, format_flag(adult.is_gory_content))?;
        self.blank()
    }

    pub fn thumbnail_intro(&mut self) -> io::Result<()> {
        self.line(self.labels.thumbnail_intro)
    }

    pub fn thumbnail_saved(&mut self, path: &Path) -> io::Result<()> {
        writeln!(self.out, "{}{}", self.labels.saving_thumbnail, path.display())
    }

    pub fn error(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{}{}", self.labels.error_occurred, message)
    }
}
