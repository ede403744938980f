// Audio output - offline export of rendered game audio

pub mod dsp_utils;
pub mod export;
