//! The `babel rank` command.

use anyhow::Result;

use babel_core::rank::rank_for;

pub fn execute(xp: u64) -> Result<()> {
    let rank = rank_for(xp);
    match rank.next_threshold() {
        Some(next) => println!(
            "{rank} ({} xp to {})",
            next - xp,
            rank_for(next)
        ),
        None => println!("{rank} (top rank)"),
    }
    Ok(())
}
