pub mod twitch_helix;
