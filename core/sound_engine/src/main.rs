use std::thread;
use std::time::Duration;

use sound_engine::engine::SoundEngine;

fn main() {
    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: sound_engine <clip.wav>");
        std::process::exit(2);
    };

    let mut engine = SoundEngine::new();
    let id = match engine.load(&path) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("failed to load {path}: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = engine.play(&id) {
        eprintln!("failed to start playback: {e}");
        std::process::exit(1);
    }
    println!("playing {path}");

    while engine.is_playing(&id) {
        engine.update();
        thread::sleep(Duration::from_millis(50));
    }
}
