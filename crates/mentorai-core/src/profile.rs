//! User profile and the built-in personas.
//!
//! A persona bundles a coaching tone with sensible defaults for wake/sleep
//! times, preferred work hours and an hourly energy curve. The profile is
//! what the user ends up with after onboarding; [`UserProfile::to_prefs`]
//! turns it into planner input.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::clock::parse_minutes_strict;
use crate::error::ValidationError;
use crate::prefs::{HourRange, UserPrefs};
use crate::task::EnergyLevel;

/// Built-in persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Emprendedor,
    Fitness,
    Estudio,
    Dieta,
}

impl Persona {
    pub const ALL: [Persona; 4] = [
        Persona::Emprendedor,
        Persona::Fitness,
        Persona::Estudio,
        Persona::Dieta,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::Emprendedor => "emprendedor",
            Persona::Fitness => "fitness",
            Persona::Estudio => "estudio",
            Persona::Dieta => "dieta",
        }
    }

    pub fn def(&self) -> PersonaDef {
        persona_def(*self)
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Persona {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Persona::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownPersona(s.to_string()))
    }
}

/// Coaching tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Directo,
    Energico,
    Calmo,
    Disciplinado,
}

/// Energy level for one hour of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourEnergy {
    pub hour: u8,
    pub level: EnergyLevel,
}

/// Defaults that come with a persona.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaDef {
    pub tone: Tone,
    pub blurb: &'static str,
    pub default_goal: &'static str,
    pub default_wake: &'static str,
    pub default_sleep: &'static str,
    pub default_preferred_hours: Vec<HourRange>,
    pub default_energy_by_hour: Vec<HourEnergy>,
}

/// 24 hourly levels, `med` unless a range covers the hour.
///
/// Ranges are inclusive on both ends; later ranges win.
pub fn build_energy_map(ranges: &[(u8, u8, EnergyLevel)]) -> Vec<HourEnergy> {
    (0..24u8)
        .map(|hour| {
            let level = ranges
                .iter()
                .rev()
                .find(|(start, end, _)| (*start..=*end).contains(&hour))
                .map(|(_, _, level)| *level)
                .unwrap_or(EnergyLevel::Medium);
            HourEnergy { hour, level }
        })
        .collect()
}

pub fn persona_def(persona: Persona) -> PersonaDef {
    use EnergyLevel::{High, Low, Medium};

    let hours = |ranges: &[(&str, &str)]| {
        ranges
            .iter()
            .map(|(start, end)| HourRange::new(*start, *end))
            .collect::<Vec<_>>()
    };

    match persona {
        Persona::Emprendedor => PersonaDef {
            tone: Tone::Directo,
            blurb: "Agilidad para construir y vender. Sin ruido.",
            default_goal: "Cerrar 1 cliente nuevo/semana",
            default_wake: "06:30",
            default_sleep: "22:30",
            default_preferred_hours: hours(&[("08:30", "12:30"), ("15:00", "18:30")]),
            default_energy_by_hour: build_energy_map(&[
                (6, 8, Medium),
                (9, 12, High),
                (13, 15, Medium),
                (16, 19, High),
                (20, 23, Low),
            ]),
        },
        Persona::Fitness => PersonaDef {
            tone: Tone::Energico,
            blurb: "Constancia y recuperación. Movimiento inteligente.",
            default_goal: "Entrenar 4x/semana y mejorar marcas",
            default_wake: "07:00",
            default_sleep: "23:00",
            default_preferred_hours: hours(&[("07:30", "09:00"), ("18:00", "20:00")]),
            default_energy_by_hour: build_energy_map(&[
                (6, 9, High),
                (10, 16, Medium),
                (17, 20, High),
                (21, 23, Low),
            ]),
        },
        Persona::Estudio => PersonaDef {
            tone: Tone::Calmo,
            blurb: "Profundidad, foco y descansos activos.",
            default_goal: "2h de estudio profundo al día",
            default_wake: "07:30",
            default_sleep: "23:30",
            default_preferred_hours: hours(&[("09:00", "12:00"), ("16:00", "19:00")]),
            default_energy_by_hour: build_energy_map(&[
                (7, 10, High),
                (11, 15, Medium),
                (16, 19, High),
                (20, 23, Low),
            ]),
        },
        Persona::Dieta => PersonaDef {
            tone: Tone::Disciplinado,
            blurb: "Hábitos sostenibles. Pasos pequeños, diario.",
            default_goal: "Cumplir plan semanal sin atracones",
            default_wake: "08:00",
            default_sleep: "23:30",
            default_preferred_hours: hours(&[("09:00", "11:00"), ("17:00", "19:00")]),
            default_energy_by_hour: build_energy_map(&[
                (8, 11, High),
                (12, 16, Medium),
                (17, 19, High),
                (20, 23, Low),
            ]),
        },
    }
}

/// The user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub persona: Persona,
    pub goal: String,
    pub wake: String,
    pub sleep: String,
    pub preferred_hours: Vec<HourRange>,
    pub energy_by_hour: Vec<HourEnergy>,
}

impl UserProfile {
    /// A profile made only of the persona's defaults.
    pub fn for_persona(persona: Persona) -> Self {
        Self::with_persona(None, persona)
    }

    /// Switch persona, keeping the current profile's fields when present.
    pub fn with_persona(current: Option<&UserProfile>, persona: Persona) -> Self {
        match current {
            Some(current) => Self {
                persona,
                ..current.clone()
            },
            None => {
                let def = persona_def(persona);
                Self {
                    persona,
                    goal: def.default_goal.to_string(),
                    wake: def.default_wake.to_string(),
                    sleep: def.default_sleep.to_string(),
                    preferred_hours: def.default_preferred_hours,
                    energy_by_hour: def.default_energy_by_hour,
                }
            }
        }
    }

    /// Validate a stored profile blob.
    ///
    /// Malformed preferred-hour and energy entries are dropped; the profile
    /// is rejected when nothing usable remains.
    pub fn sanitize(value: &serde_json::Value) -> Result<Self, ValidationError> {
        let obj = value.as_object().ok_or_else(|| ValidationError::InvalidValue {
            field: "profile".into(),
            message: "expected a JSON object".into(),
        })?;

        let persona = match obj.get("persona") {
            Some(serde_json::Value::String(name)) => name.parse::<Persona>()?,
            other => {
                return Err(ValidationError::UnknownPersona(
                    other.map(|v| v.to_string()).unwrap_or_default(),
                ))
            }
        };

        let time = |field: &str| -> Result<String, ValidationError> {
            let raw = obj.get(field).and_then(|v| v.as_str()).unwrap_or_default();
            parse_minutes_strict(raw)?;
            Ok(raw.to_string())
        };
        let wake = time("wake")?;
        let sleep = time("sleep")?;

        let goal = obj
            .get("goal")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        let preferred_hours: Vec<HourRange> = array(obj, "preferredHours")?
            .iter()
            .filter_map(|entry| {
                let start = entry.get("start")?.as_str()?;
                let end = entry.get("end")?.as_str()?;
                Some(HourRange::new(start, end))
            })
            .collect();
        if preferred_hours.is_empty() {
            return Err(ValidationError::EmptyCollection("preferredHours".into()));
        }

        let energy_by_hour: Vec<HourEnergy> = array(obj, "energyByHour")?
            .iter()
            .filter_map(|entry| {
                let hour = entry.get("hour")?.as_f64()?;
                let level = EnergyLevel::parse(entry.get("level")?.as_str()?)?;
                Some(HourEnergy {
                    hour: hour.floor().clamp(0.0, 23.0) as u8,
                    level,
                })
            })
            .collect();
        if energy_by_hour.len() < 24 {
            return Err(ValidationError::InvalidValue {
                field: "energyByHour".into(),
                message: format!("expected 24 entries, found {}", energy_by_hour.len()),
            });
        }

        Ok(Self {
            persona,
            goal,
            wake,
            sleep,
            preferred_hours,
            energy_by_hour,
        })
    }

    /// Validate an in-memory profile the same way a stored one is.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let value = serde_json::to_value(self).map_err(|e| ValidationError::InvalidValue {
            field: "profile".into(),
            message: e.to_string(),
        })?;
        Self::sanitize(&value).map(|_| ())
    }

    /// Energy level for an hour, `med` when the map has no entry.
    pub fn energy_at(&self, hour: u8) -> EnergyLevel {
        self.energy_by_hour
            .iter()
            .rev()
            .find(|e| e.hour == hour)
            .map(|e| e.level)
            .unwrap_or_default()
    }

    pub fn to_prefs(&self) -> UserPrefs {
        UserPrefs::new(&self.wake, &self.sleep).with_preferred_hours(self.preferred_hours.clone())
    }
}

fn array<'a>(
    obj: &'a serde_json::Map<String, serde_json::Value>,
    field: &str,
) -> Result<&'a Vec<serde_json::Value>, ValidationError> {
    obj.get(field)
        .and_then(|v| v.as_array())
        .ok_or_else(|| ValidationError::InvalidValue {
            field: field.to_string(),
            message: "expected an array".into(),
        })
}
