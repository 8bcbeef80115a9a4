use clap::Args;
use mentorai_core::{Config, ReplanInput, Replanner};

use super::{current_prefs, open_board, parse_now, print_plan, save_board, CliResult};

#[derive(Args)]
pub struct PlanArgs {
    /// Minutes available (e.g. 20)
    #[arg(long)]
    pub budget: Option<u32>,
    /// Tag or title fragment to put first
    #[arg(long)]
    pub focus: Option<String>,
    /// Planning instant: HH:MM or RFC 3339 (default: now)
    #[arg(long)]
    pub now: Option<String>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
    /// Show the plan without reordering the stored tasks
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: PlanArgs) -> CliResult {
    let now = parse_now(args.now.as_deref())?;
    let config = Config::load_or_default();
    let prefs = current_prefs(&config)?;
    let (store, mut board) = open_board(now)?;

    let input = ReplanInput::new(board.tasks().to_vec(), prefs)
        .with_time_budget(args.budget)
        .with_focus_tag(args.focus);
    let plan = Replanner::with_config(config.planner_config()).replan(&input, now);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_plan(&plan, board.tasks());
    }

    if !args.dry_run {
        board.apply_plan(&plan);
    }
    save_board(&store, &board)?;
    Ok(())
}
