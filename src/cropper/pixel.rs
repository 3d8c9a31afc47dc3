//! # 像素模型
//!
//! ## 设计思路
//!
//! 单个像素以 32 位整数打包存储，四个通道可独立读取与替换：
//!
//! ```text
//! bit 31..24  23..16  15..8   7..0
//!     alpha   blue    green   red
//! ```
//!
//! 裁剪流水线中 alpha 恒为不透明（255），构造函数默认保证这一点。
//! 解码得到的半透明像素先按 alpha 预乘到黑色背景再进入流水线，
//! 完全透明的像素因此变为黑色，不会被误判为亮色。

const RED_SHIFT: u32 = 0;
const GREEN_SHIFT: u32 = 8;
const BLUE_SHIFT: u32 = 16;
const ALPHA_SHIFT: u32 = 24;
const OPAQUE_ALPHA: u32 = 0xFF << ALPHA_SHIFT;

/// 打包的 RGBA 像素。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RgbaPixel(u32);

impl RgbaPixel {
    pub const BLACK: Self = Self(OPAQUE_ALPHA);
    pub const WHITE: Self = Self(u32::MAX);

    /// 由三个颜色通道构造不透明像素。
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self(
            OPAQUE_ALPHA
                | (red as u32) << RED_SHIFT
                | (green as u32) << GREEN_SHIFT
                | (blue as u32) << BLUE_SHIFT,
        )
    }

    /// 直接使用打包值构造，不修改 alpha。
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// 由 RGBA 字节序列构造（`[r, g, b, a]`）。
    pub const fn from_rgba(bytes: [u8; 4]) -> Self {
        Self(u32::from_le_bytes(bytes))
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn to_rgba(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    pub const fn red(self) -> u8 {
        (self.0 >> RED_SHIFT) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> GREEN_SHIFT) as u8
    }

    pub const fn blue(self) -> u8 {
        (self.0 >> BLUE_SHIFT) as u8
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> ALPHA_SHIFT) as u8
    }

    pub const fn with_red(self, value: u8) -> Self {
        self.with_channel(RED_SHIFT, value)
    }

    pub const fn with_green(self, value: u8) -> Self {
        self.with_channel(GREEN_SHIFT, value)
    }

    pub const fn with_blue(self, value: u8) -> Self {
        self.with_channel(BLUE_SHIFT, value)
    }

    pub const fn with_alpha(self, value: u8) -> Self {
        self.with_channel(ALPHA_SHIFT, value)
    }

    /// 强制 alpha 为 255，颜色通道保持不变。
    pub const fn opaque(self) -> Self {
        Self(self.0 | OPAQUE_ALPHA)
    }

    /// 按 alpha 预乘颜色通道（即合成到黑色背景），结果不透明。
    ///
    /// 每个通道取 `round(c * a / 255)`；`a = 255` 时颜色不变，`a = 0` 时为黑色。
    pub const fn premultiplied(self) -> Self {
        let alpha = self.alpha() as u32;
        if alpha == 0xFF {
            return self;
        }
        Self::new(
            premultiply_channel(self.red(), alpha),
            premultiply_channel(self.green(), alpha),
            premultiply_channel(self.blue(), alpha),
        )
    }

    const fn with_channel(self, shift: u32, value: u8) -> Self {
        Self((self.0 & !(0xFF << shift)) | (value as u32) << shift)
    }
}

const fn premultiply_channel(value: u8, alpha: u32) -> u8 {
    ((value as u32 * alpha + 127) / 255) as u8
}

impl From<image::Rgba<u8>> for RgbaPixel {
    fn from(value: image::Rgba<u8>) -> Self {
        Self::from_rgba(value.0)
    }
}

impl From<RgbaPixel> for image::Rgba<u8> {
    fn from(value: RgbaPixel) -> Self {
        image::Rgba(value.to_rgba())
    }
}
