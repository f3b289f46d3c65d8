use std::path::PathBuf;
use std::time::Duration;

use bellgraph_core::TraceEvent;
use bellgraph_session::{CancelToken, GraphBuilder, SessionConfig, SessionError};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), SessionError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => SessionConfig::from_yaml_path(path)?,
        None => SessionConfig::from_default_yaml()?,
    };

    let mut builder = GraphBuilder::new();
    builder.add_states_in_row(3, 150.0);
    builder
        .add_transition("S1", "S2", 0.0, "right", 0.8)?
        .add_transition("S1", "S1", 0.0, "right", 0.2)?
        .add_transition("S2", "S1", 0.0, "left", 1.0)?
        .add_transition("S2", "S3", 10.0, "right", 1.0)?;
    let mut session = builder.into_session(config)?;

    let step = session.on_step()?;
    let cancel = CancelToken::new();
    session.replay(&step.trace, &mut |_pause: Duration| {}, &cancel, |event| {
        if let TraceEvent::ComputedContribution(c) = event {
            println!(
                "Q({}, {}) += {} * ({} + {} * {:.6}) = {:.6}",
                c.state.label(),
                c.action,
                c.probability,
                c.reward,
                c.gamma,
                c.max_next_q,
                c.contribution
            );
        }
    });

    let solved = session.on_solve()?;
    println!(
        "phase={:?} iterations={}",
        solved.report.phase, solved.report.iteration
    );
    match solved.snapshot.to_json() {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("failed to render snapshot: {err}"),
    }

    Ok(())
}
