/*
[INPUT]:  Parsed CLI subcommands that do not play a lesson
[OUTPUT]: Catalog listing and interactive config initialization
[POS]:    CLI helpers for the lesson-console binary
[UPDATE]: When adding non-playback subcommands
*/

pub mod init;
pub mod list;
