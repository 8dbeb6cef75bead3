//! painlabel-vision 성능 벤치마크
//!
//! 실행: cargo bench -p painlabel-vision
//!
//! 벤치마크 대상:
//! - 크롭 지문 계산 (Fingerprint::of)
//! - 카테고리 디렉토리 전체 스캔 (find_duplicate, 중복 없음 = 최악 경우)

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image::{Rgb, RgbImage};
use painlabel_core::models::category::Category;
use painlabel_core::models::pixels::PixelBuffer;
use painlabel_vision::dedup::find_duplicate;
use painlabel_vision::fingerprint::Fingerprint;
use std::hint::black_box;

/// 테스트용 패턴 크롭 생성
fn create_crop(side: u32, seed: u8) -> PixelBuffer {
    let img = RgbImage::from_fn(side, side, |x, y| {
        Rgb([
            (x as u8).wrapping_add(seed).wrapping_mul(17),
            (y as u8).wrapping_add(seed).wrapping_mul(31),
            (x as u8).wrapping_add(y as u8).wrapping_add(seed),
        ])
    });
    PixelBuffer::new(side, side, img.into_raw()).expect("valid buffer")
}

fn bench_fingerprint(c: &mut Criterion) {
    let mut group = c.benchmark_group("fingerprint");

    for side in [64u32, 256, 512] {
        let crop = create_crop(side, 1);
        group.throughput(Throughput::Bytes(crop.as_bytes().len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(side), &crop, |b, crop| {
            b.iter(|| Fingerprint::of(black_box(crop)))
        });
    }

    group.finish();
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("duplicate_scan");
    group.sample_size(20);

    let categories: Vec<Category> = ["Indolor", "Pouca dor", "Muita dor", "Incerto"]
        .iter()
        .map(|n| Category::new(*n).expect("valid category"))
        .collect();
    let extensions = vec!["png".to_string()];

    for per_category in [25usize, 100] {
        let tmp = tempfile::TempDir::new().expect("temp dir");
        for (ci, category) in categories.iter().enumerate() {
            let dir = tmp.path().join(category.as_str());
            std::fs::create_dir_all(&dir).expect("category dir");
            for i in 0..per_category {
                let crop = create_crop(128, (ci * per_category + i) as u8);
                let img = RgbImage::from_raw(128, 128, crop.into_bytes()).expect("raw image");
                img.save(dir.join(format!("frame_{i}_bench_{ci}.png")))
                    .expect("save crop");
            }
        }

        let target = Fingerprint::of(&create_crop(97, 0));
        group.bench_function(BenchmarkId::from_parameter(per_category * 4), |b| {
            b.iter(|| {
                find_duplicate(
                    black_box(tmp.path()),
                    &categories,
                    "bench",
                    target,
                    &extensions,
                )
                .expect("scan")
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fingerprint, bench_scan);
criterion_main!(benches);
