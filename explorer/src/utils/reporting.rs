use crate::core::session::SessionSummary;
use crate::data::quest::Quest;
use crate::discovery::proximity::DiscoveryProgress;

pub fn print_discovery(quest: &Quest, tick: u64, progress: DiscoveryProgress) {
    println!("[tick {}] Quest discovered: {}", tick, quest.name);
    println!("  Reward: +{} XP", quest.xp);
    if let Some(description) = &quest.description {
        println!("  {}", description);
    }
    println!("  Progress: {}", progress);
}

pub fn print_session_summary(summary: &SessionSummary) {
    println!("\nSession Summary");
    println!("----------------------------------------");
    println!("Ticks: {}", summary.ticks);
    println!("Path points: {}", summary.path_length);
    println!("Location source: {}", summary.provider);
    println!("Quests discovered: {}", summary.progress);
    println!("Total XP: {}", summary.total_xp);
    for entry in &summary.discovered {
        println!("  {} ({}): +{} XP", entry.name, entry.id, entry.xp);
    }
    println!("Fog redraws:");
    println!("  Full replays: {}", summary.redraws.full_replays);
    println!("  Incremental updates: {}", summary.redraws.incremental_updates);
    println!("  Holes painted: {}", summary.redraws.holes_painted);
    println!("----------------------------------------");
}
