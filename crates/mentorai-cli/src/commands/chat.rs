use clap::Args;
use mentorai_core::{ChatHandler, Config, Replanner};

use super::{current_prefs, open_board, parse_now, print_plan, save_board, CliResult};

#[derive(Args)]
pub struct ChatArgs {
    /// Message to the assistant
    pub text: String,
    /// Planning instant: HH:MM or RFC 3339 (default: now)
    #[arg(long)]
    pub now: Option<String>,
    /// Output the full reply as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ChatArgs) -> CliResult {
    let now = parse_now(args.now.as_deref())?;
    let config = Config::load_or_default();
    let prefs = current_prefs(&config)?;
    let (store, mut board) = open_board(now)?;

    let handler = ChatHandler::new(
        config.intent_extractor()?,
        Replanner::with_config(config.planner_config()),
    );
    let reply = handler.handle(&args.text, board.tasks(), &prefs, now);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        println!("{}", reply.message);
        if let Some(plan) = &reply.plan {
            print_plan(plan, board.tasks());
        }
    }

    if let Some(plan) = &reply.plan {
        board.apply_plan(plan);
    }
    save_board(&store, &board)?;
    Ok(())
}
