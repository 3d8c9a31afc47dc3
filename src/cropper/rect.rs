//! 裁剪矩形（原图坐标系）。

use super::CropError;

/// 原图坐标系下的裁剪矩形。
///
/// 通过 `full_width` 构造的矩形始终满足 `x == 0`、`width == 原图宽度`，
/// 且 `y + height <= 原图高度`、`height > 0`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    /// 构造整宽、变高的裁剪矩形。
    ///
    /// `top` / `height` 来自带符号的边界换算；空矩形或越界矩形一律拒绝，不做截断。
    pub fn full_width(
        source_width: u32,
        source_height: u32,
        top: i64,
        height: i64,
    ) -> Result<Self, CropError> {
        let degenerate = || CropError::DegenerateCrop {
            top,
            height,
            source_height,
        };

        if height <= 0 || top < 0 || top + height > i64::from(source_height) {
            return Err(degenerate());
        }

        let y = u32::try_from(top).map_err(|_| degenerate())?;
        let height = u32::try_from(height).map_err(|_| degenerate())?;

        Ok(Self {
            x: 0,
            y,
            width: source_width,
            height,
        })
    }

    /// 矩形下边界（不含）。
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        u64::from(self.x) + u64::from(self.width) <= u64::from(width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_width_accepts_band_inside_source() {
        let rect = CropRect::full_width(400, 800, 2, 398).expect("rect should be valid");
        assert_eq!(rect, CropRect { x: 0, y: 2, width: 400, height: 398 });
        assert_eq!(rect.bottom(), 400);
        assert!(rect.fits_within(400, 800));
    }

    #[test]
    fn full_width_rejects_empty_and_negative_heights() {
        for height in [0, -2] {
            let err = CropRect::full_width(400, 800, 402, height).unwrap_err();
            assert!(err.is_degenerate());
        }
    }

    #[test]
    fn full_width_rejects_out_of_bounds_instead_of_clamping() {
        let err = CropRect::full_width(10, 10, 8, 4).unwrap_err();
        assert!(matches!(
            err,
            CropError::DegenerateCrop { top: 8, height: 4, source_height: 10 }
        ));

        assert!(CropRect::full_width(10, 10, -1, 4).is_err());
        assert!(CropRect::full_width(10, 10, 6, 4).is_ok());
    }
}
