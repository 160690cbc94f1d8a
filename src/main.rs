use anyhow::Result;
use clap::Parser;

use chroniq::cli::{self, Args, Context};
use chroniq::config;
use chroniq::logging;
use chroniq::ui::{self, Theme};

fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    let config_path = config::config_path(args.config.as_deref());
    let resolution = config::resolve(args.profile.as_deref(), Some(config_path.as_path()));

    let ctx = match Context::new(resolution.config, config_path, args.profile.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            ui::display_error(&Theme::default(), &format!("{:#}", e));
            std::process::exit(1);
        }
    };

    if let Some(diagnostic) = &resolution.diagnostic {
        ui::display_warning(&ctx.theme, &diagnostic.to_string());
    }

    if let Err(e) = run(&ctx, args) {
        ui::display_error(&ctx.theme, &format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(ctx: &Context, args: Args) -> Result<()> {
    tracing::debug!(profile = ctx.config.active_profile(), "dispatching command");
    cli::dispatch(ctx, args.command)
}
