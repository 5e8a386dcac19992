//! Terminal rendering

use std::collections::BTreeMap;

use fs_core::Credits;
use fs_slot_lab::{
    GameState, PayTable, RoundReport, Stats, SymbolId, WeightedSampler, WinTier, catalog,
};

pub fn print_round(report: &RoundReport, now_ms: u64) {
    println!("── Spin #{} [t={}ms] ──", report.spin_number, now_ms);
    println!("{}", report.grid);
    if report.is_win() {
        let lines: Vec<String> = report
            .winning_lines
            .iter()
            .map(|l| (l + 1).to_string())
            .collect();
        println!(
            "{} +{} credits on line{} {}",
            report.tier.label().to_uppercase(),
            report.payout,
            if lines.len() == 1 { "" } else { "s" },
            lines.join(", ")
        );
    } else {
        println!("{}", report.tier.label());
    }
    if let Some(rate) = report.drifted_win_rate {
        println!("(win rate now {:.1}%)", rate * 100.0);
    }
    println!("credits: {}\n", report.credits_after);
}

pub fn print_session(state: &GameState) {
    println!("Credits:   {}", state.credits);
    println!("Line bet:  {} (total {})", state.line_bet, state.total_bet);
    if state.cheats.enabled {
        println!("Cheats:    ON");
    }
    print_stats(&state.stats);
}

pub fn print_stats(stats: &Stats) {
    println!("Spins:     {}", stats.total_spins);
    println!(
        "Wins:      {} ({}%)   Losses: {}",
        stats.total_wins,
        stats.win_percentage(),
        stats.total_losses
    );
    println!("Biggest:   {}", stats.biggest_win);
    println!(
        "Won/lost:  {} / {} (net {:+})",
        stats.total_won,
        stats.total_lost,
        stats.net()
    );
    if stats.has_cheated {
        println!("           * cheats were used this session");
    }
}

pub fn print_paytable(table: &PayTable, line_bet: u32) {
    let sampler = WeightedSampler::new();
    println!("{:<4} {:<10} {:>6} {:>7} {:>8}", "", "Symbol", "Pays", "Weight", "Chance");
    for (idx, symbol) in catalog().iter().enumerate().rev() {
        let chance = SymbolId::from_index(idx)
            .map(|id| sampler.probability(id))
            .unwrap_or(0.0);
        println!(
            "{:<4} {:<10} {:>6} {:>7} {:>7.2}%",
            symbol.emoji,
            symbol.name,
            Credits::from(symbol.payout_multiplier) * Credits::from(line_bet),
            symbol.weight,
            chance * 100.0
        );
    }
    println!(
        "\n{} paylines, total bet {} at line bet {}",
        table.line_count(),
        table.total_bet(line_bet),
        line_bet
    );
    for payline in &table.paylines {
        let rows: Vec<String> = payline.positions.iter().map(u8::to_string).collect();
        println!("  line {}: rows [{}]", payline.index + 1, rows.join(", "));
    }
}

pub struct SimulationSummary {
    pub spins: u64,
    pub wagered: Credits,
    pub paid: Credits,
    pub tiers: BTreeMap<WinTier, u64>,
    pub drifts: Vec<(u64, f64)>,
}

pub fn print_simulation(summary: &SimulationSummary) {
    let rtp = if summary.wagered == 0 {
        0.0
    } else {
        summary.paid as f64 / summary.wagered as f64 * 100.0
    };
    println!("Spins:     {}", summary.spins);
    println!("Wagered:   {}", summary.wagered);
    println!("Paid:      {}", summary.paid);
    println!("RTP:       {:.2}%", rtp);
    for (tier, count) in &summary.tiers {
        let share = *count as f64 / summary.spins.max(1) as f64 * 100.0;
        println!("  {:<11} {:>8} ({:.2}%)", tier.label(), count, share);
    }
    if !summary.drifts.is_empty() {
        println!("Win-rate drift:");
        for (spin, rate) in &summary.drifts {
            println!("  after spin {:>6}: {:.3}", spin, rate);
        }
    }
}
