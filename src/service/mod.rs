pub mod music;
pub mod now_playing;
pub mod voice;
