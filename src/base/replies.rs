//! Canned reply text for the informational commands.

/// `bizhawk`: emulator setup and submission guides.
pub const BIZHAWK: &str = "Here's a complete guide for setting up and submitting emulator RTA runs with BizHawk: <https://www.speedrun.com/fusion/forums/sef63>\n\
Here is a video guide that shows you how to submit valid runs: <https://youtu.be/aG6mWiXZlt8>";

/// `tutorial`: full game tutorials.
pub const TUTORIAL: &str = "[Any% tutorial](<https://www.youtube.com/playlist?list=PLW3wkDRmBh4jkWezk89bT_rQhb10TxpGk>) by HerculesBenchpress\n\
[Any% tutorial](<https://www.youtube.com/watch?v=ZIjdl9NZyUI>) by JRP2234\n\
[Any% tutorial](<https://www.youtube.com/playlist?list=PL3pBMjeS6rYhtLVGWtLoCeD7C2aZrkl9n>) by kirbymastah\n\
[100% tutorial](<https://youtu.be/OLFBVAf9Kbg>) by HerculesBenchpress";

/// `debug`: practice patches.
pub const DEBUG: &str = "[English Debug Patch](<https://www.speedrun.com/fusion/resources/sa2pd>)\n\
[English Skip Loading Fanfare Patch](<https://www.speedrun.com/fusion/resources/g2vyd>)\n\
[Japanese Debug Patch](<https://www.speedrun.com/fusion/resources/894i6>)\n\
[Japanese Skip Loading Fanfare Patch](<https://www.speedrun.com/fusion/resources/mbqvq>)";

/// `nso`: converting runs recorded on Nintendo Switch Online.
pub const NSO: &str = "[Converter for NSO runs](<https://nudua.com/convert>) | Enter **60** in \"Source\" and **59.7275** in \"To\"\n\
You can also use `convert <time>` to have me do it.";

/// `damage`: weapon damage and cooldown table.
pub const DAMAGE: &str = "Damage and cooldown values can be found [here](<https://kb.speeddemosarchive.com/Metroid_Fusion/Game_Mechanics_and_Tricks#Weapon_Information_.5B1.5D>)";

/// Link to the community spreadsheet of enemy names.
pub const ENEMY_LIST: &str = "[(list of enemy names)](<https://docs.google.com/spreadsheets/d/1S7UH4Mo8BPfYlp39hxPVUth-IQzjBVaxVK0oC8qWOvA/edit?usp=sharing>)";

/// Header of the `help` reply.
pub const HELP_HEADER: &str = "Available commands:\n";

/// Thumbs up, used to acknowledge an accepted strat.
pub const ACK_EMOJI: &str = "👍";
