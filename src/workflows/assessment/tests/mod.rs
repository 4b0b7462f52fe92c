mod common;
mod sequencer;
