//! Binding between named UI controls and [`Settings`] fields
//!
//! Each control has a stable name, a widget description and exactly one
//! settings field it writes. Hosts build their widgets from [`CONTROLS`] and
//! report changes back through [`Settings::apply`].

use std::fmt;
use std::str::FromStr;

use crate::params::Settings;

/// Identifier of a bound control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlId {
    ParticleCount,
    AttractConstant,
    InteractionRadius,
    ConnectionOpacity,
    TrailOpacity,
    TrailEnabled,
    Gravity,
    DragConstant,
    Elasticity,
    InitialVelocity,
    ExplosionRadius,
    ExplosionForce,
    SmoothingFactor,
}

impl ControlId {
    pub const ALL: [ControlId; 13] = [
        ControlId::ParticleCount,
        ControlId::AttractConstant,
        ControlId::InteractionRadius,
        ControlId::ConnectionOpacity,
        ControlId::TrailOpacity,
        ControlId::TrailEnabled,
        ControlId::Gravity,
        ControlId::DragConstant,
        ControlId::Elasticity,
        ControlId::InitialVelocity,
        ControlId::ExplosionRadius,
        ControlId::ExplosionForce,
        ControlId::SmoothingFactor,
    ];

    /// Stable external name of the control
    pub fn name(self) -> &'static str {
        match self {
            ControlId::ParticleCount => "particleCount",
            ControlId::AttractConstant => "attractConstant",
            ControlId::InteractionRadius => "interactionRadius",
            ControlId::ConnectionOpacity => "connectionOpacity",
            ControlId::TrailOpacity => "trailOpacity",
            ControlId::TrailEnabled => "trailEnabled",
            ControlId::Gravity => "gravity",
            ControlId::DragConstant => "dragConstant",
            ControlId::Elasticity => "elasticity",
            ControlId::InitialVelocity => "initialVelocity",
            ControlId::ExplosionRadius => "explosionRadius",
            ControlId::ExplosionForce => "explosionForce",
            ControlId::SmoothingFactor => "smoothingFactor",
        }
    }

    pub fn spec(self) -> &'static ControlSpec {
        // CONTROLS is ordered like ALL
        &CONTROLS[self as usize]
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ControlId {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ControlId::ALL
            .into_iter()
            .find(|id| id.name() == s)
            .ok_or_else(|| ControlError::UnknownControl(s.to_string()))
    }
}

/// Widget shape of a control
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlKind {
    Slider { min: f64, max: f64, step: f64 },
    Checkbox,
}

/// Where a control is shown in the settings panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlGroup {
    Basic,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlSpec {
    pub id: ControlId,
    pub label: &'static str,
    pub kind: ControlKind,
    pub group: ControlGroup,
}

const fn slider(
    id: ControlId,
    label: &'static str,
    min: f64,
    max: f64,
    step: f64,
    group: ControlGroup,
) -> ControlSpec {
    ControlSpec {
        id,
        label,
        kind: ControlKind::Slider { min, max, step },
        group,
    }
}

/// Widget table, one entry per [`ControlId`] in declaration order
pub const CONTROLS: [ControlSpec; 13] = [
    slider(ControlId::ParticleCount, "particle count", 13.0, 2000.0, 10.0, ControlGroup::Basic),
    slider(ControlId::AttractConstant, "attraction", -2000.0, 2000.0, 10.0, ControlGroup::Basic),
    slider(ControlId::InteractionRadius, "interaction radius", 10.0, 200.0, 1.0, ControlGroup::Basic),
    slider(ControlId::ConnectionOpacity, "connection opacity", 0.0, 1.0, 0.01, ControlGroup::Basic),
    slider(ControlId::TrailOpacity, "trail opacity", 0.0, 0.3, 0.01, ControlGroup::Basic),
    ControlSpec {
        id: ControlId::TrailEnabled,
        label: "enable trails",
        kind: ControlKind::Checkbox,
        group: ControlGroup::Basic,
    },
    slider(ControlId::Gravity, "gravity", -300.0, 300.0, 1.0, ControlGroup::Advanced),
    slider(ControlId::DragConstant, "drag", 0.0, 1.0, 0.01, ControlGroup::Advanced),
    slider(ControlId::Elasticity, "elasticity", 0.0, 1.0, 0.01, ControlGroup::Advanced),
    slider(ControlId::InitialVelocity, "initial velocity", 0.0, 10.0, 0.1, ControlGroup::Advanced),
    slider(ControlId::ExplosionRadius, "explosion radius", 10.0, 500.0, 1.0, ControlGroup::Advanced),
    slider(ControlId::ExplosionForce, "explosion force", 0.0, 100.0, 1.0, ControlGroup::Advanced),
    slider(ControlId::SmoothingFactor, "smoothing", 0.0, 1.0, 0.01, ControlGroup::Advanced),
];

/// Value reported by a control
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlValue {
    Number(f64),
    Toggle(bool),
}

impl ControlValue {
    /// Parse raw widget text for the given control
    pub fn parse(id: ControlId, text: &str) -> Result<Self, ControlError> {
        let text = text.trim();
        match id.spec().kind {
            ControlKind::Checkbox => match text {
                "true" | "on" | "1" => Ok(ControlValue::Toggle(true)),
                "false" | "off" | "0" => Ok(ControlValue::Toggle(false)),
                _ => Err(ControlError::InvalidInput {
                    id,
                    text: text.to_string(),
                }),
            },
            ControlKind::Slider { .. } => text
                .parse::<f64>()
                .map(ControlValue::Number)
                .map_err(|_| ControlError::InvalidInput {
                    id,
                    text: text.to_string(),
                }),
        }
    }
}

impl fmt::Display for ControlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlValue::Number(v) => write!(f, "{}", v),
            ControlValue::Toggle(v) => write!(f, "{}", v),
        }
    }
}

/// What the caller has to do after a setting changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingChange {
    /// Picked up by the next tick, nothing else to do
    Updated,
    /// The particle collection must be rebuilt
    Reinitialize,
}

/// Errors from applying control input
#[derive(Debug, Clone, PartialEq)]
pub enum ControlError {
    /// No control carries this name
    UnknownControl(String),
    /// A toggle was sent to a slider or the other way round
    TypeMismatch { id: ControlId, value: ControlValue },
    /// Input text could not be read as a value for the control
    InvalidInput { id: ControlId, text: String },
    /// NaN or infinite number
    NonFinite { id: ControlId, value: f64 },
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlError::UnknownControl(name) => write!(f, "Unknown control '{}'", name),
            ControlError::TypeMismatch { id, value } => {
                write!(f, "Control '{}' does not accept value {}", id, value)
            }
            ControlError::InvalidInput { id, text } => {
                write!(f, "Control '{}' cannot parse '{}'", id, text)
            }
            ControlError::NonFinite { id, value } => {
                write!(f, "Control '{}' rejected non-finite value {}", id, value)
            }
        }
    }
}

impl std::error::Error for ControlError {}

impl Settings {
    /// Current value of the field bound to `id`
    pub fn value(&self, id: ControlId) -> ControlValue {
        use ControlValue::Number;

        match id {
            ControlId::ParticleCount => Number(self.particle_count as f64),
            ControlId::AttractConstant => Number(self.attract_constant as f64),
            ControlId::InteractionRadius => Number(self.interaction_radius as f64),
            ControlId::ConnectionOpacity => Number(self.connection_opacity as f64),
            ControlId::TrailOpacity => Number(self.trail_opacity as f64),
            ControlId::TrailEnabled => ControlValue::Toggle(self.trail_enabled),
            ControlId::Gravity => Number(self.gravity as f64),
            ControlId::DragConstant => Number(self.drag_constant as f64),
            ControlId::Elasticity => Number(self.elasticity as f64),
            ControlId::InitialVelocity => Number(self.initial_velocity as f64),
            ControlId::ExplosionRadius => Number(self.explosion_radius as f64),
            ControlId::ExplosionForce => Number(self.explosion_force as f64),
            ControlId::SmoothingFactor => Number(self.smoothing_factor as f64),
        }
    }

    /// Write a control's value into its field.
    ///
    /// Only a particle count change asks for reinitialization; everything
    /// else is read fresh by the next tick. The particle count is rounded and
    /// clamped to its slider range.
    pub fn apply(&mut self, id: ControlId, value: ControlValue) -> Result<SettingChange, ControlError> {
        let number = match (id, value) {
            (ControlId::TrailEnabled, ControlValue::Toggle(checked)) => {
                self.trail_enabled = checked;
                return Ok(SettingChange::Updated);
            }
            (ControlId::TrailEnabled, ControlValue::Number(_)) | (_, ControlValue::Toggle(_)) => {
                return Err(ControlError::TypeMismatch { id, value });
            }
            (_, ControlValue::Number(n)) => n,
        };

        if !number.is_finite() {
            return Err(ControlError::NonFinite { id, value: number });
        }

        let v = number as f32;
        match id {
            ControlId::ParticleCount => {
                let ControlKind::Slider { min, max, .. } = id.spec().kind else {
                    return Err(ControlError::TypeMismatch { id, value });
                };
                self.particle_count = number.round().clamp(min, max) as usize;
                return Ok(SettingChange::Reinitialize);
            }
            ControlId::AttractConstant => self.attract_constant = v,
            ControlId::InteractionRadius => self.interaction_radius = v,
            ControlId::ConnectionOpacity => self.connection_opacity = v,
            ControlId::TrailOpacity => self.trail_opacity = v,
            ControlId::Gravity => self.gravity = v,
            ControlId::DragConstant => self.drag_constant = v,
            ControlId::Elasticity => self.elasticity = v,
            ControlId::InitialVelocity => self.initial_velocity = v,
            ControlId::ExplosionRadius => self.explosion_radius = v,
            ControlId::ExplosionForce => self.explosion_force = v,
            ControlId::SmoothingFactor => self.smoothing_factor = v,
            ControlId::TrailEnabled => return Err(ControlError::TypeMismatch { id, value }),
        }
        Ok(SettingChange::Updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_ids() {
        for (i, id) in ControlId::ALL.into_iter().enumerate() {
            assert_eq!(CONTROLS[i].id, id);
            assert_eq!(id.spec().id, id);
        }
    }

    #[test]
    fn test_names_round_trip() {
        for id in ControlId::ALL {
            assert_eq!(id.name().parse::<ControlId>(), Ok(id));
        }
        assert_eq!(
            "warpDrive".parse::<ControlId>(),
            Err(ControlError::UnknownControl("warpDrive".into()))
        );
    }

    #[test]
    fn test_defaults_sit_inside_slider_ranges() {
        let settings = Settings::default();
        for spec in CONTROLS {
            if let (ControlKind::Slider { min, max, .. }, ControlValue::Number(v)) =
                (spec.kind, settings.value(spec.id))
            {
                assert!(v >= min && v <= max, "{} = {} outside {}..{}", spec.id, v, min, max);
            }
        }
    }

    #[test]
    fn test_apply_updates_field() {
        let mut settings = Settings::default();
        let change = settings
            .apply(ControlId::Gravity, ControlValue::Number(120.0))
            .unwrap();
        assert_eq!(change, SettingChange::Updated);
        assert_eq!(settings.gravity, 120.0);

        settings
            .apply(ControlId::TrailEnabled, ControlValue::Toggle(false))
            .unwrap();
        assert!(!settings.trail_enabled);
    }

    #[test]
    fn test_particle_count_requests_reinitialize() {
        let mut settings = Settings::default();
        let change = settings
            .apply(ControlId::ParticleCount, ControlValue::Number(310.0))
            .unwrap();
        assert_eq!(change, SettingChange::Reinitialize);
        assert_eq!(settings.particle_count, 310);
    }

    #[test]
    fn test_rejects_wrong_kind_and_non_finite() {
        let mut settings = Settings::default();
        assert!(matches!(
            settings.apply(ControlId::TrailEnabled, ControlValue::Number(1.0)),
            Err(ControlError::TypeMismatch { .. })
        ));
        assert!(matches!(
            settings.apply(ControlId::Elasticity, ControlValue::Number(f64::NAN)),
            Err(ControlError::NonFinite { .. })
        ));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_huge_particle_count_is_clamped_to_slider_range() {
        let mut settings = Settings::default();
        let value = ControlValue::parse(ControlId::ParticleCount, "1e20").unwrap();
        let change = settings.apply(ControlId::ParticleCount, value).unwrap();
        assert_eq!(change, SettingChange::Reinitialize);
        assert_eq!(settings.particle_count, 2000);

        settings
            .apply(ControlId::ParticleCount, ControlValue::Number(-40.0))
            .unwrap();
        assert_eq!(settings.particle_count, 13);
    }

    #[test]
    fn test_toggle_only_reaches_its_own_field() {
        let mut settings = Settings::default();
        assert!(matches!(
            settings.apply(ControlId::Gravity, ControlValue::Toggle(false)),
            Err(ControlError::TypeMismatch { .. })
        ));
        assert!(settings.trail_enabled);
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_parse_text_input() {
        assert_eq!(
            ControlValue::parse(ControlId::DragConstant, " 0.25 "),
            Ok(ControlValue::Number(0.25))
        );
        assert_eq!(
            ControlValue::parse(ControlId::TrailEnabled, "on"),
            Ok(ControlValue::Toggle(true))
        );
        assert!(matches!(
            ControlValue::parse(ControlId::Gravity, "abc"),
            Err(ControlError::InvalidInput { .. })
        ));
    }
}
