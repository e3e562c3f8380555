pub mod status;
pub mod transcribe;
pub mod transcription;
pub mod user_transcriptions;
