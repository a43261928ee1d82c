// DOM contract with the host page and a few front-end-only tuning values.

// Element ids
pub const CONFIG_ID: &str = "mood-config";
pub const SCENE_ROOT_ID: &str = "scene-root";
pub const SKY_ID: &str = "sky";
pub const LAYERS_ID: &str = "scene-layers";
pub const NEAR_MIST_ID: &str = "near-mist";
pub const CELESTIAL_ID: &str = "celestial";
pub const PARTICLE_CANVAS_ID: &str = "particle-canvas";
pub const TINT_ID: &str = "post-tint";
pub const VIGNETTE_ID: &str = "post-vignette";
pub const GRAIN_ID: &str = "post-grain";
pub const TITLE_ID: &str = "scene-title";
pub const AUDIO_BLOCKED_ID: &str = "audio-blocked";
pub const GUIDE_STATUS_ID: &str = "guide-status";
pub const GUIDE_CAPTION_ID: &str = "guide-caption";
pub const GUIDE_NOTICE_ID: &str = "guide-notice";
pub const CAMERA_PREVIEW_ID: &str = "camera-preview";
pub const CAMERA_STATUS_ID: &str = "camera-status";
pub const MUTE_BUTTON_ID: &str = "mute-toggle";
pub const GUIDE_BUTTON_ID: &str = "guide-toggle";
pub const CAMERA_BUTTON_ID: &str = "camera-toggle";

// CSS classes
pub const SUN_CLASS: &str = "sun";
pub const MOON_CLASS: &str = "moon";
pub const SWAY_HEAVY_CLASS: &str = "sway-heavy";
pub const SWAY_GENTLE_CLASS: &str = "sway-gentle";

// Speech
pub const RECOGNITION_LANG: &str = "en-US";
pub const RECITATION_LANG_PREFIX: &str = "hi";
pub const PLAIN_LANG_PREFIX: &str = "en";
