// Shared visual/audio tuning constants used by the core and the web frontend.

// Parallax
pub const TILE_WIDTH_PX: f32 = 1200.0; // width of one tileable scenery asset
pub const WRAP_TILES: f32 = 2.0; // wrap after this many tiles
pub const TILE_REPEAT: usize = 4; // copies rendered per layer to hide the seam
pub const LAYER_COLOR_EASE_SEC: f64 = 1.5;
pub const FOG_EASE_SEC: f64 = 2.0;

// Post-processing
pub const POST_EASE_SEC: f64 = 1.0;
pub const BLOOM_RADIUS_PER_INTENSITY: f32 = 20.0; // px of glow per unit bloom
pub const BLOOM_ALPHA_PER_INTENSITY: f32 = 0.3;
pub const GRAIN_TILE_PX: usize = 128;

// Scene title
pub const TITLE_DELAY_SEC: f64 = 0.5;
pub const TITLE_HOLD_SEC: f64 = 3.0;

// Particles: pool sizes per system
pub const RAIN_COUNT: usize = 800;
pub const ASH_COUNT: usize = 150;
pub const FOG_COUNT: usize = 25;
pub const BIRD_COUNT: usize = 20;
pub const FIREFLY_COUNT: usize = 60;

// Particles: motion
pub const ASH_WOBBLE_RATE: f32 = 0.002; // per ms
pub const ASH_WOBBLE_AMPLITUDE: f32 = 0.5;
pub const BIRD_BOB_RATE: f32 = 0.004;
pub const BIRD_BOB_AMPLITUDE: f32 = 0.3;
pub const BIRD_FLAP_RATE: f32 = 0.015;
pub const BIRD_FLAP_AMPLITUDE: f32 = 4.0;
pub const FIREFLY_PULSE_RATE: f32 = 0.003;
pub const EMBER_SHARE: f32 = 0.15;
pub const WRAP_MARGIN_PX: f32 = 200.0; // fog/fireflies wrap this far outside the viewport
pub const BIRD_BAND: f32 = 0.4; // birds fly in the top fraction of the height

// Audio
pub const MASTER_LEVEL: f32 = 0.8;
pub const MUTE_TAU_SEC: f64 = 0.1;
pub const EMOTION_FADE_IN_SEC: f64 = 1.0;
pub const EMOTION_FADE_OUT_TAU_SEC: f64 = 0.1;
pub const TEARDOWN_GRACE_SEC: f64 = 0.5;
pub const NOISE_BUFFER_SEC: f32 = 2.0;
pub const SILENT_FLOOR: f32 = 0.001; // exponential ramps cannot reach zero
pub const AUDIO_RETRY_FRAMES: u32 = 120; // frames between attempts to rebuild a failed voice

// Remote classification / guidance
pub const CLASSIFY_TIMEOUT_MS: u64 = 2500;
pub const SILENCE_DEBOUNCE_MS: u64 = 2000;
pub const PAUSE_AFTER_INTRO_MS: u64 = 300;
pub const PAUSE_AFTER_VERSE_MS: u64 = 500;

// Bridge / capture
pub const BRIDGE_RECONNECT_MS: u64 = 5000;
pub const CAPTURE_INTERVAL_MS: u64 = 500;
pub const CAPTURE_WIDTH_PX: u32 = 300;
pub const DEFAULT_INNER_STATE: f32 = 0.5;
