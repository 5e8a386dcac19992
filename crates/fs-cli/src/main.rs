//! FruitSpin command-line driver
//!
//! Usage:
//!   fruitspin play --spins 10        - Play rounds against the saved session
//!   fruitspin play --auto --spins 50 - Auto-spin until 50 rounds or out of credits
//!   fruitspin simulate --spins 100000
//!   fruitspin paytable               - Symbol table and paylines
//!   fruitspin stats | reset | credits <N> | export <FILE> | import <FILE>

mod output;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use fs_core::{Credits, RandomSource, RngSource};
use fs_slot_lab::{
    Action, CREDIT_PRESETS, CheatAction, DispatchOutcome, ForcedRow, GameConfig, GameState,
    PayTable, SlotMachine, SymbolId, TimingConfig, TimingProfile, total_bet_for,
};
use fs_state::SaveStore;

use crate::output::SimulationSummary;

#[derive(Parser)]
#[command(name = "fruitspin", about = "Three-by-three fruit machine", version)]
struct Cli {
    /// Game config (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Save file (defaults to the platform data directory)
    #[arg(long, global = true)]
    save: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play rounds, resuming the saved session
    Play {
        /// Rounds to play
        #[arg(short = 'n', long, default_value_t = 1)]
        spins: u64,
        /// Line bet (1-100)
        #[arg(short, long)]
        line_bet: Option<u32>,
        /// Keep spinning on the auto-spin schedule
        #[arg(short, long)]
        auto: bool,
        /// Seed for a reproducible session
        #[arg(long)]
        seed: Option<u64>,
        /// Timing profile
        #[arg(long, value_enum)]
        timing: Option<TimingArg>,
        /// Cheat: fill the reels with the jackpot symbol
        #[arg(long)]
        jackpot: bool,
        /// Cheat: forced-win probability (0-1)
        #[arg(long)]
        win_rate: Option<f64>,
        /// Cheat: middle row, e.g. "🍒,_,🌟" or "cherry,_,star"
        #[arg(long)]
        force: Option<String>,
        /// Ignore and overwrite any saved session
        #[arg(long)]
        fresh: bool,
        /// Do not write the session back
        #[arg(long)]
        no_save: bool,
    },
    /// Run many instant rounds and report return-to-player
    Simulate {
        #[arg(short = 'n', long, default_value_t = 10_000)]
        spins: u64,
        #[arg(short, long, default_value_t = 1)]
        line_bet: u32,
        #[arg(long)]
        seed: Option<u64>,
        /// Hold the win rate fixed (cheats on, no drift)
        #[arg(long)]
        win_rate: Option<f64>,
    },
    /// Show symbols, payouts and paylines
    Paytable {
        #[arg(short, long, default_value_t = 1)]
        line_bet: u32,
    },
    /// Show the saved session
    Stats,
    /// Set the saved balance (presets: 1000, 10000, 100000, 1000000)
    Credits { amount: Credits },
    /// Zero the saved statistics
    ResetStats,
    /// Delete the saved session
    Reset,
    /// Export the saved session to a file
    Export { path: PathBuf },
    /// Replace the saved session with an exported file
    Import { path: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum TimingArg {
    Normal,
    Turbo,
    Instant,
}

impl From<TimingArg> for TimingProfile {
    fn from(arg: TimingArg) -> Self {
        match arg {
            TimingArg::Normal => TimingProfile::Normal,
            TimingArg::Turbo => TimingProfile::Turbo,
            TimingArg::Instant => TimingProfile::Instant,
        }
    }
}

type Machine = SlotMachine<Box<dyn RandomSource>>;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let store = SaveStore::with_config(
        cli.save.unwrap_or_else(SaveStore::default_location),
        config.clone(),
    );

    match cli.command {
        Commands::Play {
            spins,
            line_bet,
            auto,
            seed,
            timing,
            jackpot,
            win_rate,
            force,
            fresh,
            no_save,
        } => {
            let mut config = config;
            if let Some(timing) = timing {
                config.timing = TimingConfig::from_profile(timing.into());
            }
            let cheats = CheatArgs {
                jackpot,
                win_rate,
                force: force.as_deref().map(parse_forced_row).transpose()?,
            };
            let mut machine = open_machine(&store, config, seed, fresh)?;
            if !no_save {
                machine.set_sink(Some(Box::new(store.clone())));
            }
            play(&mut machine, spins, line_bet, auto, cheats)
        }
        Commands::Simulate {
            spins,
            line_bet,
            seed,
            win_rate,
        } => simulate(config, spins, line_bet, seed, win_rate),
        Commands::Paytable { line_bet } => {
            output::print_paytable(&PayTable::standard(), config.clamp_line_bet(line_bet));
            Ok(())
        }
        Commands::Stats => {
            match store.load().context("Failed to read saved session")? {
                Some(state) => output::print_session(&state),
                None => println!("No saved session at {}", store.path().display()),
            }
            Ok(())
        }
        Commands::Credits { amount } => {
            if !CREDIT_PRESETS.contains(&amount) {
                log::info!("Credits {} is not one of the presets {:?}", amount, CREDIT_PRESETS);
            }
            update_saved(&store, config, Action::SetCredits(amount))
        }
        Commands::ResetStats => update_saved(&store, config, Action::ResetStats),
        Commands::Reset => {
            store.clear().context("Failed to delete save")?;
            println!("Session cleared");
            Ok(())
        }
        Commands::Export { path } => {
            let state = store
                .load()
                .context("Failed to read saved session")?
                .unwrap_or_else(|| GameState::new(&config));
            store
                .export_to(&state, &path)
                .with_context(|| format!("Failed to export to {}", path.display()))?;
            println!("Exported to {}", path.display());
            Ok(())
        }
        Commands::Import { path } => {
            let state = store
                .import_from(&path)
                .with_context(|| format!("Failed to import {}", path.display()))?;
            store.save(&state).context("Failed to write save")?;
            println!("Imported {} credits from {}", state.credits, path.display());
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    GameConfig::from_yaml(&yaml).with_context(|| format!("Invalid config {}", path.display()))
}

fn rng(seed: Option<u64>) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) => Box::new(RngSource::seeded(seed)),
        None => Box::new(RngSource::from_entropy()),
    }
}

/// Machine resumed from the store unless `fresh`
fn open_machine(
    store: &SaveStore,
    config: GameConfig,
    seed: Option<u64>,
    fresh: bool,
) -> Result<Machine> {
    let mut machine = SlotMachine::new(config, rng(seed)).context("Invalid game config")?;
    if !fresh {
        if let Some(state) = store.load().context("Failed to read saved session")? {
            machine.dispatch(Action::Restore(Box::new(state)));
        }
    }
    Ok(machine)
}

fn update_saved(store: &SaveStore, config: GameConfig, action: Action) -> Result<()> {
    let mut machine = open_machine(store, config, None, false)?;
    machine.dispatch(action);
    store.save(machine.state()).context("Failed to write save")?;
    output::print_session(machine.state());
    Ok(())
}

struct CheatArgs {
    jackpot: bool,
    win_rate: Option<f64>,
    force: Option<ForcedRow>,
}

impl CheatArgs {
    fn any(&self) -> bool {
        self.jackpot || self.win_rate.is_some() || self.force.is_some()
    }
}

fn parse_forced_row(row: &str) -> Result<ForcedRow> {
    let slots = row
        .split(',')
        .map(|part| {
            let part = part.trim();
            if part.is_empty() || part == "_" || part == "-" {
                return Ok(None);
            }
            SymbolId::from_emoji(part)
                .or_else(|| SymbolId::from_name(part))
                .map(Some)
                .with_context(|| format!("Unknown symbol '{part}'"))
        })
        .collect::<Result<Vec<_>>>()?;
    ForcedRow::new(slots).context("Bad --force row")
}

fn play(
    machine: &mut Machine,
    spins: u64,
    line_bet: Option<u32>,
    auto: bool,
    cheats: CheatArgs,
) -> Result<()> {
    if let Some(line_bet) = line_bet {
        machine.dispatch(Action::SetLineBet(line_bet));
    }
    if cheats.any() {
        if !machine.state().cheats.enabled {
            machine.dispatch(Action::Cheat(CheatAction::ToggleEnabled));
        }
        if let Some(rate) = cheats.win_rate {
            machine.dispatch(Action::Cheat(CheatAction::SetWinRate(rate)));
        }
        if cheats.force.is_some() {
            machine.dispatch(Action::Cheat(CheatAction::SetForceSymbols(cheats.force)));
        }
        machine.dispatch(Action::Cheat(CheatAction::SetAlwaysJackpot(cheats.jackpot)));
    }

    if !machine.state().can_afford_spin() {
        bail!(
            "Not enough credits: {} < bet {} (try `fruitspin credits 1000`)",
            machine.state().credits,
            machine.state().total_bet
        );
    }

    let played = if auto {
        play_auto(machine, spins)
    } else {
        play_manual(machine, spins)
    };

    machine.shutdown();
    println!("Played {} round{}", played, if played == 1 { "" } else { "s" });
    output::print_session(machine.state());
    Ok(())
}

fn play_manual(machine: &mut Machine, spins: u64) -> u64 {
    let mut played = 0;
    while played < spins {
        if let DispatchOutcome::Ignored(reason) = machine.dispatch(Action::Spin) {
            println!("Stopped: {:?}", reason);
            break;
        }
        if let Some(report) = machine.finish_round() {
            output::print_round(&report, machine.now_ms());
            played += 1;
        }
    }
    played
}

fn play_auto(machine: &mut Machine, spins: u64) -> u64 {
    machine.dispatch(Action::ToggleAutoSpin);
    let mut played = 0;
    while played < spins {
        let before = machine.stats().total_spins;
        if !machine.step() {
            println!("Auto-spin stopped: out of credits");
            break;
        }
        if machine.stats().total_spins > before {
            if let Some(report) = machine.last_round() {
                output::print_round(report, machine.now_ms());
            }
            played += 1;
        }
    }
    if machine.state().auto_spin {
        machine.dispatch(Action::ToggleAutoSpin);
    }
    played
}

fn simulate(
    mut config: GameConfig,
    spins: u64,
    line_bet: u32,
    seed: Option<u64>,
    win_rate: Option<f64>,
) -> Result<()> {
    config.timing = TimingConfig::instant();
    let line_bet = config.clamp_line_bet(line_bet);
    config.starting_credits = total_bet_for(line_bet).saturating_mul(spins);

    let mut machine = SlotMachine::new(config, rng(seed)).context("Invalid game config")?;
    machine.dispatch(Action::SetLineBet(line_bet));
    if let Some(rate) = win_rate {
        machine.dispatch(Action::Cheat(CheatAction::ToggleEnabled));
        machine.dispatch(Action::Cheat(CheatAction::SetWinRate(rate)));
    }

    let mut summary = SimulationSummary {
        spins: 0,
        wagered: 0,
        paid: 0,
        tiers: BTreeMap::new(),
        drifts: Vec::new(),
    };
    for _ in 0..spins {
        if !machine.dispatch(Action::Spin).is_applied() {
            break;
        }
        let Some(report) = machine.finish_round() else {
            break;
        };
        summary.spins += 1;
        summary.wagered += report.total_bet;
        summary.paid += report.payout;
        *summary.tiers.entry(report.tier).or_default() += 1;
        if let Some(rate) = report.drifted_win_rate {
            summary.drifts.push((report.spin_number, rate));
        }
    }

    output::print_simulation(&summary);
    Ok(())
}
