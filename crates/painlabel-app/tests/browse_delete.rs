//! 크롭 조회/삭제 통합 테스트.

use async_trait::async_trait;
use painlabel_app::capture::CaptureSession;
use painlabel_app::wiring::AnnotationServices;
use painlabel_core::config::AppConfig;
use painlabel_core::error::CoreError;
use painlabel_core::models::category::Category;
use painlabel_core::models::pixels::PixelBuffer;
use painlabel_core::models::record::{Coordinates, Record};
use painlabel_core::models::selection::CropSelection;
use painlabel_core::ports::playback::PlaybackSource;
use std::path::Path;
use tempfile::TempDir;

struct Paused {
    video: &'static str,
    frame: PixelBuffer,
}

#[async_trait]
impl PlaybackSource for Paused {
    fn video_name(&self) -> &str {
        self.video
    }

    fn current_time_ms(&self) -> u64 {
        4_000
    }

    fn fps(&self) -> f64 {
        30.0
    }

    async fn snapshot_frame(&self) -> Result<PixelBuffer, CoreError> {
        Ok(self.frame.clone())
    }
}

fn frame(seed: u8) -> PixelBuffer {
    let bytes = (0..48 * 48 * 3u32)
        .map(|i| (i as u8).wrapping_mul(7).wrapping_add(seed))
        .collect();
    PixelBuffer::new(48, 48, bytes).unwrap()
}

fn services(root: &Path) -> AnnotationServices {
    let mut config = AppConfig::default_config();
    config.storage.root_dir = root.to_path_buf();
    AnnotationServices::from_config(&config).unwrap()
}

fn category(name: &str) -> Category {
    Category::new(name).unwrap()
}

/// vid: Indolor 2개, Incerto 1개 / outro: Indolor 1개
async fn populate(services: &AnnotationServices) {
    let vid = Paused {
        video: "vid",
        frame: frame(0),
    };
    let mut session = CaptureSession::open(services.clone(), &vid).await.unwrap();
    session
        .save("Indolor", CropSelection::new(0, 0, 16, 16))
        .await
        .unwrap();
    session
        .save("Indolor", CropSelection::new(16, 16, 32, 32))
        .await
        .unwrap();
    session
        .save("Incerto", CropSelection::new(30, 2, 46, 18))
        .await
        .unwrap();

    let outro = Paused {
        video: "outro",
        frame: frame(99),
    };
    CaptureSession::open(services.clone(), &outro)
        .await
        .unwrap()
        .save("Indolor", CropSelection::new(4, 4, 20, 20))
        .await
        .unwrap();
}

#[tokio::test]
async fn list_groups_crops_by_category_for_one_video() {
    let tmp = TempDir::new().unwrap();
    let services = services(tmp.path());
    populate(&services).await;

    let listings = services.browser().list_for_video("vid").await.unwrap();
    let counts: Vec<(String, usize)> = listings
        .iter()
        .map(|l| (l.category.to_string(), l.files.len()))
        .collect();
    assert_eq!(
        counts,
        vec![
            ("Indolor".to_string(), 2),
            ("Pouca dor".to_string(), 0),
            ("Muita dor".to_string(), 0),
            ("Incerto".to_string(), 1),
        ]
    );
    // 4000ms @ 30fps → 120번 프레임
    assert_eq!(
        listings[0].record_paths(),
        vec![
            "Indolor/frame_120_vid_1.png".to_string(),
            "Indolor/frame_120_vid_2.png".to_string(),
        ]
    );
}

#[tokio::test]
async fn delete_removes_file_and_only_its_records() {
    let tmp = TempDir::new().unwrap();
    let services = services(tmp.path());
    populate(&services).await;
    let browser = services.browser();

    let outcome = browser
        .delete_crop("Indolor/frame_120_vid_1.png")
        .await
        .unwrap();
    assert!(outcome.file_removed);
    assert_eq!(outcome.file_error, None);
    assert_eq!(outcome.records_removed, 20);
    assert!(!tmp.path().join("Indolor/frame_120_vid_1.png").exists());

    let indolor = services.record_log.load(&category("Indolor")).await.unwrap();
    assert_eq!(indolor.len(), 40);
    assert!(indolor
        .iter()
        .all(|r| r.path != "Indolor/frame_120_vid_1.png"));
    assert_eq!(
        services.record_log.load(&category("Incerto")).await.unwrap().len(),
        20
    );
}

#[tokio::test]
async fn missing_file_still_prunes_records() {
    let tmp = TempDir::new().unwrap();
    let services = services(tmp.path());
    services.initialize_layout().await.unwrap();

    let ghost = Record {
        video_name: "vid".to_string(),
        frame: 3,
        coordinates: Coordinates {
            x1: 0,
            x2: 8,
            y1: 0,
            y2: 8,
        },
        path: "Pouca dor/ghost.png".to_string(),
    };
    for name in ["Pouca dor", "Muita dor"] {
        services
            .record_log
            .append_records(&category(name), &[ghost.clone()])
            .await
            .unwrap();
    }

    let outcome = services
        .browser()
        .delete_crop("Pouca dor/ghost.png")
        .await
        .unwrap();
    assert!(!outcome.file_removed);
    assert!(outcome.file_error.is_some());
    assert_eq!(outcome.records_removed, 2);
}

#[tokio::test]
async fn escaping_path_is_reported_without_touching_files() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("store");
    std::fs::create_dir_all(&root).unwrap();
    let outside = tmp.path().join("keep.png");
    std::fs::write(&outside, b"x").unwrap();

    let services = services(&root);
    let outcome = services.browser().delete_crop("../keep.png").await.unwrap();
    assert!(!outcome.file_removed);
    assert_eq!(outcome.records_removed, 0);
    assert!(outside.exists());
}
