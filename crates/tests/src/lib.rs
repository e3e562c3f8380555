pub mod fixtures;

#[cfg(test)]
mod status_tests;
#[cfg(test)]
mod transcription_tests;
#[cfg(test)]
mod workflow_tests;
