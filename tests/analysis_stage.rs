//! Analysis stage tests against in-memory service and image source

mod common;

use common::{adult, caption, category, landmark, object, png_bytes, MockImageSource, MockVisionService};
use tempfile::TempDir;
use vision_analyze::{
    analyze_image, AdultReportPolicy, AnalysisConfig, AnalysisResult, DetectedBrand, ImageTag,
    Locale, ReportWriter, VisionError, VisualFeature,
};

const URL: &str = "https://example.com/beach.png";

fn config(dir: &TempDir, policy: AdultReportPolicy) -> AnalysisConfig {
    AnalysisConfig::builder()
        .output_dir(dir.path())
        .adult_policy(policy)
        .build()
        .unwrap()
}

fn dog_result() -> AnalysisResult {
    let mut result = AnalysisResult {
        tags: vec![ImageTag {
            name: "dog".to_string(),
            confidence: 0.75,
            hint: None,
        }],
        categories: vec![category("animal_dog", 0.5, None)],
        objects: vec![object("dog", 8, 8, 40, 24)],
        adult: adult(false, false, false),
        ..AnalysisResult::default()
    };
    result.description.captions = vec![caption("a dog on a beach", 0.5)];
    result
}

#[tokio::test]
async fn test_full_swedish_report_with_objects() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, AdultReportPolicy::Always);
    let service = MockVisionService::new(dog_result());
    let source = MockImageSource::serving(png_bytes(64, 48, [0, 0, 0]));
    let mut report = ReportWriter::new(Vec::new(), Locale::Swedish);

    let outcome = analyze_image(&service, &source, URL, &config, &mut report)
        .await
        .unwrap();

    let objects_path = config.objects_path();
    assert_eq!(outcome.annotated_path.as_deref(), Some(objects_path.as_path()));
    assert!(outcome.adult_reported);

    let expected = format!(
        "Analyserar din bild: {URL}\n\
         \n\
         Beskrivning: a dog on a beach (tillförlitlighet: 50,00 %)\n\
         \n\
         Taggar:\n \
         -dog (tillförlitlighet: 75,00 %)\n\
         Kategorier:\n \
         - animal_dog (tillförlitlighet: 50,00 %)\n\
         Objekt i bilden:\n \
         -dog (tillförlitlighet: 75,00 %)\n\
         \n\
         Sparar bild med objekt i {}\n\
         \n\
         Bedömningar av känsligt innehåll:\n \
         -Vuxet: False\n \
         -Racy: False\n \
         -Blodigt: False\n\
         \n",
        objects_path.display()
    );
    let output = String::from_utf8(report.into_inner()).unwrap();
    assert_eq!(output, expected);
}

#[tokio::test]
async fn test_annotated_image_written_once() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, AdultReportPolicy::Always);
    let service = MockVisionService::new(dog_result());
    let source = MockImageSource::serving(png_bytes(64, 48, [0, 0, 0]));
    let mut report = ReportWriter::new(Vec::new(), Locale::Swedish);

    analyze_image(&service, &source, URL, &config, &mut report)
        .await
        .unwrap();

    let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(files.len(), 1);

    let annotated = image::open(config.objects_path()).unwrap().to_rgb8();
    assert_eq!(annotated.dimensions(), (64, 48));

    // right edge of the box (x + w) is stroked, the inside stays dark
    let edge = annotated.get_pixel(48, 30);
    assert!(edge[1] > 120 && edge[2] > 120, "edge pixel {:?}", edge);
    assert!(edge[1] > edge[0]);
    let inside = annotated.get_pixel(30, 26);
    assert!(inside[1] < 60, "inside pixel {:?}", inside);

    // the image was fetched once and the same bytes were analyzed
    assert_eq!(source.fetch_count(), 1);
    assert_eq!(service.received_bytes().len(), 1);
}

#[tokio::test]
async fn test_fetched_buffer_shared_with_service() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, AdultReportPolicy::Always);
    let service = MockVisionService::new(AnalysisResult::default());
    let source = MockImageSource::serving(png_bytes(16, 16, [0, 0, 0]));
    let mut report = ReportWriter::new(Vec::new(), Locale::Swedish);

    analyze_image(&service, &source, URL, &config, &mut report)
        .await
        .unwrap();

    assert_eq!(service.received_addrs(), vec![source.buffer_addr()]);
}

#[tokio::test]
async fn test_all_features_requested() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, AdultReportPolicy::Always);
    let service = MockVisionService::new(AnalysisResult::default());
    let source = MockImageSource::serving(png_bytes(4, 4, [0, 0, 0]));
    let mut report = ReportWriter::new(Vec::new(), Locale::Swedish);

    analyze_image(&service, &source, URL, &config, &mut report)
        .await
        .unwrap();

    assert_eq!(service.requested_features(), VisualFeature::ALL.to_vec());
}

#[tokio::test]
async fn test_no_objects_with_object_gated_adult_report() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, AdultReportPolicy::WithObjects);
    let result = AnalysisResult {
        adult: adult(true, false, false),
        ..AnalysisResult::default()
    };
    let service = MockVisionService::new(result);
    let source = MockImageSource::serving(png_bytes(4, 4, [0, 0, 0]));
    let mut report = ReportWriter::new(Vec::new(), Locale::Swedish);

    let outcome = analyze_image(&service, &source, URL, &config, &mut report)
        .await
        .unwrap();

    assert!(outcome.annotated_path.is_none());
    assert!(!outcome.adult_reported);
    assert!(!config.objects_path().exists());

    let output = String::from_utf8(report.into_inner()).unwrap();
    assert!(!output.contains("Objekt i bilden:"));
    assert!(!output.contains("Bedömningar av känsligt innehåll:"));
    assert!(output.contains("Kategorier:\n"));
}

#[tokio::test]
async fn test_no_objects_adult_reported_once_by_default() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, AdultReportPolicy::Always);
    let result = AnalysisResult {
        adult: adult(false, true, false),
        ..AnalysisResult::default()
    };
    let service = MockVisionService::new(result);
    let source = MockImageSource::serving(png_bytes(4, 4, [0, 0, 0]));
    let mut report = ReportWriter::new(Vec::new(), Locale::Swedish);

    let outcome = analyze_image(&service, &source, URL, &config, &mut report)
        .await
        .unwrap();

    assert!(outcome.adult_reported);
    assert!(outcome.annotated_path.is_none());
    let output = String::from_utf8(report.into_inner()).unwrap();
    assert_eq!(output.matches("Bedömningar av känsligt innehåll:").count(), 1);
    assert!(output.contains(" -Racy: True\n"));
}

#[tokio::test]
async fn test_landmarks_and_brands_reported() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, AdultReportPolicy::Always);
    let result = AnalysisResult {
        categories: vec![
            category("building_", 0.5, Some(vec![landmark("Eiffel Tower", 0.75)])),
            category("outdoor_city", 0.25, Some(vec![
                landmark("Eiffel Tower", 0.5),
                landmark("Champ de Mars", 0.5),
            ])),
        ],
        brands: vec![DetectedBrand {
            name: "Contoso".to_string(),
            confidence: 0.5,
            rectangle: None,
        }],
        ..AnalysisResult::default()
    };
    let service = MockVisionService::new(result);
    let source = MockImageSource::serving(png_bytes(4, 4, [0, 0, 0]));
    let mut report = ReportWriter::new(Vec::new(), Locale::English);

    analyze_image(&service, &source, URL, &config, &mut report)
        .await
        .unwrap();

    let output = String::from_utf8(report.into_inner()).unwrap();
    assert!(output.contains(
        "Landmarks:\n - Eiffel Tower (confidence: 75.00%)\n - Champ de Mars (confidence: 50.00%)\n"
    ));
    assert_eq!(output.matches("Eiffel Tower").count(), 1);
    assert!(output.contains("Brands:\n - Contoso (confidence: 50.00%)\n"));
}

#[tokio::test]
async fn test_fetch_failure_propagates() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, AdultReportPolicy::Always);
    let service = MockVisionService::new(dog_result());
    let source = MockImageSource::failing();
    let mut report = ReportWriter::new(Vec::new(), Locale::Swedish);

    let err = analyze_image(&service, &source, URL, &config, &mut report)
        .await
        .unwrap_err();

    assert!(matches!(err, VisionError::Network(_)));
    assert!(service.requested_features().is_empty());
    assert!(!config.objects_path().exists());
}

#[tokio::test]
async fn test_undecodable_image_with_objects_fails() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, AdultReportPolicy::Always);
    let service = MockVisionService::new(dog_result());
    let source = MockImageSource::serving(b"not an image".to_vec());
    let mut report = ReportWriter::new(Vec::new(), Locale::Swedish);

    let err = analyze_image(&service, &source, URL, &config, &mut report)
        .await
        .unwrap_err();

    assert!(matches!(err, VisionError::Processing(_)));
    assert!(!config.objects_path().exists());
}
