//! Memorable alias generation.
//!
//! Every record gets an auto-generated `adjective-noun-number` slug. Slugs
//! are informational only: they are not unique-indexed and never used for
//! lookup, so collisions are harmless.

use rand::Rng;

const ADJECTIVES: &[&str] = &[
    "amber", "ancient", "autumn", "billowing", "bold", "broken", "calm", "cold", "crimson",
    "dawn", "divine", "dry", "fading", "falling", "floral", "fragrant", "frosty", "hidden",
    "holy", "icy", "late", "lingering", "little", "lively", "misty", "morning", "muddy",
    "nameless", "patient", "plain", "polished", "proud", "quiet", "restless", "rough",
    "shy", "silent", "small", "snowy", "solitary", "sparkling", "spring", "still", "summer",
    "twilight", "wandering", "weathered", "wild", "winter", "young",
];

const NOUNS: &[&str] = &[
    "band", "bird", "breeze", "brook", "bush", "butterfly", "cell", "cherry", "cloud",
    "darkness", "dawn", "dew", "disk", "dream", "dust", "feather", "field", "fire",
    "firefly", "flower", "fog", "forest", "frog", "frost", "glade", "glitter", "grass",
    "harbor", "haze", "hill", "lake", "leaf", "meadow", "moon", "mountain", "night",
    "paper", "pine", "pond", "rain", "resonance", "ridge", "river", "sea", "shadow",
    "shape", "silence", "sky", "smoke", "snow", "sound", "star", "stone", "sun",
    "sunset", "surf", "thunder", "tree", "violet", "voice", "water", "waterfall",
    "wave", "wildflower", "wind", "wood",
];

/// Generate a memorable alias such as `misty-river-4821`.
pub fn haikunate() -> String {
    let mut rng = rand::thread_rng();
    let adjective = ADJECTIVES[rng.gen_range(0..ADJECTIVES.len())];
    let noun = NOUNS[rng.gen_range(0..NOUNS.len())];
    let token: u16 = rng.gen_range(1000..10000);
    format!("{}-{}-{}", adjective, noun, token)
}
