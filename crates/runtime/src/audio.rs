//! Impact sounds.
//!
//! Collision events carry a tag and an impact speed; this module decides
//! whether that impact is audible and which clip plays. Playback itself is
//! left to whoever consumes the [`SoundCue`]s.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use hoops_physics::CollisionEvent;
use tracing::{debug, trace};

use crate::scene::{BALL_TAG, HOOP_TAG};

/// Impact speed at which a sound plays at full volume.
pub const MAX_IMPACT: f32 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SoundRule {
    /// Clip file stem; variant `n` plays `{clip}{n}`, counting from 1.
    pub clip: String,
    pub variants: usize,
    /// Impacts at or below this speed stay silent.
    pub min_impact: f32,
    pub cooldown: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SoundCue {
    pub tag: String,
    pub clip: String,
    pub variant: usize,
    /// In `[0, 1]`.
    pub volume: f32,
}

impl SoundCue {
    pub fn clip_name(&self) -> String {
        format!("{}{}", self.clip, self.variant + 1)
    }
}

/// Per-tag thresholds and cooldowns. While a tag is cooling down, further
/// impacts with that tag are dropped, not queued.
#[derive(Debug)]
pub struct ImpactSoundPolicy {
    rules: BTreeMap<String, SoundRule>,
    last_played: BTreeMap<String, Instant>,
    rng: fastrand::Rng,
}

impl ImpactSoundPolicy {
    /// Court defaults: seven bounce clips, three rim clips.
    pub fn new(seed: u64) -> Self {
        let cooldown = Duration::from_millis(250);
        Self::empty(seed)
            .with_rule(
                BALL_TAG,
                SoundRule {
                    clip: "bounce".into(),
                    variants: 7,
                    min_impact: 0.5,
                    cooldown,
                },
            )
            .with_rule(
                HOOP_TAG,
                SoundRule {
                    clip: "hoophit".into(),
                    variants: 3,
                    min_impact: 1.5,
                    cooldown,
                },
            )
    }

    pub fn empty(seed: u64) -> Self {
        Self {
            rules: BTreeMap::new(),
            last_played: BTreeMap::new(),
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    #[must_use]
    pub fn with_rule(mut self, tag: impl Into<String>, rule: SoundRule) -> Self {
        self.rules.insert(tag.into(), rule);
        self
    }

    pub fn rule(&self, tag: &str) -> Option<&SoundRule> {
        self.rules.get(tag)
    }

    /// Decide what, if anything, `event` sounds like at `now`.
    pub fn on_collision(&mut self, event: &CollisionEvent, now: Instant) -> Option<SoundCue> {
        let tag = event.tag.as_str();
        let Some(rule) = self.rules.get(tag) else {
            trace!(tag, "no sound for tag");
            return None;
        };

        if let Some(&played) = self.last_played.get(tag) {
            if now.saturating_duration_since(played) < rule.cooldown {
                trace!(tag, "sound cooling down");
                return None;
            }
        }

        let strength = event.impact_speed.min(MAX_IMPACT);
        if strength <= rule.min_impact || rule.variants == 0 {
            return None;
        }

        let cue = SoundCue {
            tag: tag.to_owned(),
            clip: rule.clip.clone(),
            variant: self.rng.usize(..rule.variants),
            volume: strength / MAX_IMPACT,
        };
        self.last_played.insert(tag.to_owned(), now);
        debug!(clip = %cue.clip_name(), volume = cue.volume, "impact sound");
        Some(cue)
    }
}
