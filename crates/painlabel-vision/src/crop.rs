//! 크롭 추출 및 image 크레이트 변환.

use image::{DynamicImage, RgbImage};
use painlabel_core::error::CoreError;
use painlabel_core::models::pixels::PixelBuffer;
use painlabel_core::models::selection::CropSelection;
use std::path::Path;
use tracing::debug;

/// `DynamicImage` → RGB8 픽셀 버퍼 (알파 채널 제거)
pub fn to_pixel_buffer(image: &DynamicImage) -> Result<PixelBuffer, CoreError> {
    let rgb = image.to_rgb8();
    let (w, h) = rgb.dimensions();
    PixelBuffer::new(w, h, rgb.into_raw())
}

/// 픽셀 버퍼 → `RgbImage` (인코딩용)
pub fn to_rgb_image(buffer: &PixelBuffer) -> Result<RgbImage, CoreError> {
    RgbImage::from_raw(buffer.width(), buffer.height(), buffer.as_bytes().to_vec()).ok_or_else(
        || {
            CoreError::Internal(format!(
                "RgbImage 변환 실패: {}x{}",
                buffer.width(),
                buffer.height()
            ))
        },
    )
}

/// 이미지 파일 디코딩
pub fn decode_file(path: &Path) -> Result<PixelBuffer, CoreError> {
    let image = image::open(path)
        .map_err(|e| CoreError::Image(format!("{}: {e}", path.display())))?;
    to_pixel_buffer(&image)
}

/// 프레임에서 선택 영역 픽셀을 잘라낸다.
///
/// 선택 영역이 비어 있거나 프레임을 벗어나면 아무것도 쓰기 전에 실패한다.
pub fn extract_crop(frame: &PixelBuffer, selection: &CropSelection) -> Result<PixelBuffer, CoreError> {
    selection.validate(frame.width(), frame.height())?;

    let channels = PixelBuffer::CHANNELS;
    let stride = frame.width() as usize * channels;
    let row_len = selection.width() as usize * channels;
    let src = frame.as_bytes();

    let mut out = Vec::with_capacity(row_len * selection.height() as usize);
    for y in selection.y1..selection.y2 {
        let start = y as usize * stride + selection.x1 as usize * channels;
        out.extend_from_slice(&src[start..start + row_len]);
    }

    debug!(
        "크롭 추출: ({}, {})-({}, {}) / {}x{}",
        selection.x1,
        selection.y1,
        selection.x2,
        selection.y2,
        frame.width(),
        frame.height()
    );
    PixelBuffer::new(selection.width(), selection.height(), out)
}
