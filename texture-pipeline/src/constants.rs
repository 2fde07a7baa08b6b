/// Shared tuning constants for the texture synthesis pipeline.

/// Lowest accepted upscale factor; smaller requests clamp up to this.
pub const MIN_UPSCALE: f32 = 1.0;

/// Highest accepted upscale factor; larger requests clamp down to this.
pub const MAX_UPSCALE: f32 = 8.0;

/// Default upscale factor for service and CLI requests.
pub const DEFAULT_UPSCALE: f32 = 4.0;

/// Sharpening convolution applied after resampling (kernel sum = 1).
pub const SHARPEN_KERNEL: [[i32; 3]; 3] = [[-1, -1, -1], [-1, 9, -1], [-1, -1, -1]];

/// Neighbour luminance delta above which the denoise pass treats a
/// pixel boundary as an edge and leaves it alone.
pub const DENOISE_LUMA_THRESHOLD: i16 = 24;

/// Z component fed into the normal vector before normalization; larger
/// values flatten the map.
pub const NORMAL_STRENGTH: f32 = 5.0;

/// Guard added to the normalization denominator so flat regions divide
/// cleanly instead of producing NaNs.
pub const NORMAL_EPSILON: f32 = 1e-5;

/// Horizontal Sobel operator.
pub const SOBEL_X: [[f32; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];

/// Vertical Sobel operator.
pub const SOBEL_Y: [[f32; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Clip limit for adaptive local-contrast equalization.
pub const CLAHE_CLIP_LIMIT: f32 = 3.0;

/// Tile grid dimension for adaptive equalization (8x8 tiles).
pub const CLAHE_TILE_GRID: u32 = 8;

/// Rec. 601 luminance weights for RGB input.
pub const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];
