//! テンプレート照合のベンチマーク
//!
//! 方式ごとのスコア計算とフレーム選択の所要時間を測定

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use frame_picker::core::{Frame, MatchRect, MatchResult, ReferenceExtent};
use frame_picker::interactive::AlwaysAccept;
use frame_picker::selection::select_frames;
use frame_picker::template_matching::{CorrelationLocator, MatchMethod, PatternLocator};
use image::{GrayImage, Luma};
use std::time::Duration;

fn textured_frame(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        let mixed = (x.wrapping_mul(73_856_093) ^ y.wrapping_mul(19_349_663))
            .wrapping_mul(2_654_435_761);
        Luma([(mixed >> 24) as u8])
    })
}

/// 縮小後のフレームサイズ相当での照合
fn benchmark_locate(c: &mut Criterion) {
    let mut group = c.benchmark_group("Locate");
    group.measurement_time(Duration::from_secs(10));

    let frame = textured_frame(480, 640);
    let pattern = image::imageops::crop_imm(&frame, 120, 400, 160, 80).to_image();
    let locator = CorrelationLocator::new();

    for method in MatchMethod::ALL {
        group.bench_with_input(
            BenchmarkId::from_parameter(method.name()),
            &method,
            |b, &method| {
                b.iter(|| std::hint::black_box(locator.locate(&frame, &pattern, method).unwrap()))
            },
        );
    }

    group.finish();
}

/// 照合結果からのフレーム選択
fn benchmark_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("Selection");

    let extent = ReferenceExtent::new(480, 640);
    let results: Vec<MatchResult> = (0..2000u32)
        .map(|i| {
            let y = 600u32.saturating_sub(i * 3 / 10);
            MatchResult::new(
                Frame::new(format!("DSCF{i:05}.JPG"), i as u64),
                MatchRect::new(120, y, 160, 80),
            )
        })
        .collect();

    group.bench_function("2000 frames", |b| {
        b.iter(|| {
            let mut confirmer = AlwaysAccept;
            std::hint::black_box(select_frames(results.clone(), extent, &mut confirmer).unwrap())
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_locate, benchmark_selection);
criterion_main!(benches);
