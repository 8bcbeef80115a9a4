use clap::Subcommand;
use mentorai_core::profile::persona_def;
use mentorai_core::{Persona, ProfileStore, UserProfile};

use super::CliResult;

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the stored profile
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Switch persona, creating the profile if needed
    SetPersona {
        /// emprendedor, fitness, estudio or dieta
        persona: String,
        /// Replace every field with the persona defaults
        #[arg(long)]
        reset: bool,
    },
    /// List the built-in personas
    Personas,
}

pub fn run(action: ProfileAction) -> CliResult {
    let store = ProfileStore::open()?;

    match action {
        ProfileAction::Show { json } => match store.load()? {
            Some(profile) if json => println!("{}", serde_json::to_string_pretty(&profile)?),
            Some(profile) => {
                println!("Persona: {}", profile.persona);
                println!("Goal:    {}", profile.goal);
                println!("Day:     {} - {}", profile.wake, profile.sleep);
                let hours: Vec<String> = profile
                    .preferred_hours
                    .iter()
                    .map(|h| format!("{}-{}", h.start, h.end))
                    .collect();
                println!("Hours:   {}", hours.join(", "));
            }
            None => println!("No profile yet. Run `mentorai profile set-persona <persona>`."),
        },
        ProfileAction::SetPersona { persona, reset } => {
            let persona: Persona = persona.parse()?;
            let current = if reset { None } else { store.load()? };
            let profile = UserProfile::with_persona(current.as_ref(), persona);
            profile.validate()?;
            store.save(&profile)?;
            println!("Persona set: {persona}");
        }
        ProfileAction::Personas => {
            for persona in Persona::ALL {
                let def = persona_def(persona);
                println!("{persona:<12} {}", def.blurb);
                println!("{:<12} goal: {}, {} - {}", "", def.default_goal, def.default_wake, def.default_sleep);
            }
        }
    }
    Ok(())
}
