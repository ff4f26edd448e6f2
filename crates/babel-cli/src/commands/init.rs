//! The `babel init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("babel.toml").exists() {
        println!("babel.toml already exists, skipping.");
    } else {
        std::fs::write("babel.toml", SAMPLE_CONFIG)?;
        println!("Created babel.toml");
    }

    std::fs::create_dir_all("vocab")?;
    let example_path = std::path::Path::new("vocab/french.json");
    if example_path.exists() {
        println!("vocab/french.json already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_WORDS)?;
        println!("Created vocab/french.json");
    }

    println!("\nNext steps:");
    println!("  1. Point [sources.*] in babel.toml at your published sheets");
    println!("  2. Run: babel catalog");
    println!("  3. Run: babel play");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# babel configuration

default_language = "Spanish"
cache_ttl_secs = 600
builtin_seed = true
tier = "free"

# A published sheet tab, one row per word with the columns:
#   <Language>, Script, Phonetic, Correct Translation, Wrong 1, Wrong 2, Wrong 3
# [sources.japanese]
# type = "sheet"
# language = "Japanese"
# sheet_id = "${BABEL_SHEET_ID}"
# tab = "Japanese"

[sources.french]
type = "file"
language = "French"
path = "vocab/french.json"

[speech]
enabled = true

[labels]
free_tier_notice = "You are on the Free Tier. (Limited to 20 daily words)."
"#;

const EXAMPLE_WORDS: &str = r#"[
  {
    "French": "Le chat",
    "Phonetic": "luh SHAH",
    "Correct Translation": "The cat",
    "Wrong 1": "The dog",
    "Wrong 2": "The bird",
    "Wrong 3": "The fish"
  },
  {
    "French": "Le pain",
    "Phonetic": "luh PAN",
    "Correct Translation": "The bread",
    "Wrong 1": "The wine",
    "Wrong 2": "The cheese",
    "Wrong 3": "The butter"
  },
  {
    "French": "Bonsoir",
    "Correct Translation": "Good evening",
    "Wrong 1": "Good morning",
    "Wrong 2": "Goodbye",
    "Wrong 3": "Thank you"
  }
]
"#;
