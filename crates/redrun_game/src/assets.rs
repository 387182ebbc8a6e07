//! Central asset store: every texture and music track the game uses,
//! loaded up front and owned for the life of the process.
//!
//! Nodes never hold GPU or audio objects; they hold string keys (via
//! `SpriteHandle`) and borrow from the store at draw time. A key that is
//! missing from the tables is a startup failure, not something the loop
//! has to cope with. GPU and audio handles are released when the store
//! drops, strictly after every node is gone.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

use redrun_render::{SpriteHandle, SpritePipeline, Texture};
use rodio::source::Source;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

/// Fixed texture table: store key -> file path.
const TEXTURE_TABLE: &[(&str, &str)] = &[
    ("menuFace", "assets/textures/stalinFace.png"),
    ("overSymbol", "assets/textures/sovietSymbol.png"),
    ("leninStatue", "assets/textures/backLeninArt.png"),
    ("black-run", "assets/textures/gfx/black-run.png"),
    ("black-death", "assets/textures/gfx/black-death.png"),
    ("background", "assets/textures/gfx/bg.png"),
    ("layer1", "assets/textures/gfx/bg1.png"),
    ("layer2", "assets/textures/gfx/bg2.png"),
    ("layer3", "assets/textures/gfx/bg3.png"),
    ("layer4", "assets/textures/gfx/road.png"),
];

/// Fixed music table: store key -> file path.
const MUSIC_TABLE: &[(&str, &str)] = &[
    ("sovietMenuMusic", "assets/music/sovietTheme8bitBegin.mp3"),
    ("sovietOverTheme", "assets/music/sovietTheme8bitEnd.mp3"),
    ("levelTheme", "assets/music/attackGame.mp3"),
    ("internacionalTheme", "assets/music/internacional8bitEndGame.mp3"),
];

pub struct GpuTexture {
    pub texture: Texture,
    pub bind_group: wgpu::BindGroup,
}

/// An in-memory encoded music track, decode-validated at load time so
/// playback later cannot fail on malformed data.
pub struct MusicTrack {
    bytes: Arc<[u8]>,
}

pub struct Assets {
    textures: HashMap<Arc<str>, GpuTexture>,
    music: HashMap<Arc<str>, MusicTrack>,
}

impl Assets {
    /// Load both fixed tables. Any unreadable or undecodable file fails
    /// the whole load; there is no partial store.
    pub fn load(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pipeline: &SpritePipeline,
    ) -> Result<Self, String> {
        let mut textures = HashMap::new();
        for &(key, path) in TEXTURE_TABLE {
            let bytes = std::fs::read(path)
                .map_err(|e| format!("Failed to read texture '{key}' from {path}: {e}"))?;
            let texture = Texture::from_bytes(device, queue, &bytes, path)?;
            let bind_group = pipeline.create_texture_bind_group(device, &texture);
            textures.insert(
                Arc::from(key),
                GpuTexture {
                    texture,
                    bind_group,
                },
            );
        }
        log::info!("Loaded {} textures", textures.len());

        let mut music = HashMap::new();
        for &(key, path) in MUSIC_TABLE {
            let bytes: Arc<[u8]> = std::fs::read(path)
                .map_err(|e| format!("Failed to read music '{key}' from {path}: {e}"))?
                .into();
            Decoder::new(Cursor::new(bytes.clone()))
                .map_err(|e| format!("Failed to decode music '{key}' from {path}: {e}"))?;
            music.insert(Arc::from(key), MusicTrack { bytes });
        }
        log::info!("Loaded {} music tracks", music.len());

        Ok(Self { textures, music })
    }

    pub fn texture(&self, key: &str) -> Result<&GpuTexture, String> {
        self.textures
            .get(key)
            .ok_or_else(|| format!("Unknown texture key '{key}'"))
    }

    /// Bind-group lookup for the draw loop. Misses are impossible for
    /// keys that came out of `sprite()`, so this stays `Option` and the
    /// caller skips the draw with a warning.
    pub fn texture_bind_group(&self, key: &str) -> Option<&wgpu::BindGroup> {
        self.textures.get(key).map(|t| &t.bind_group)
    }

    /// Resolve a texture key into the non-owning handle nodes keep.
    pub fn sprite(&self, key: &str) -> Result<SpriteHandle, String> {
        let texture = self.texture(key)?;
        Ok(SpriteHandle {
            key: Arc::from(key),
            size: texture.texture.size,
        })
    }

    pub fn music(&self, key: &str) -> Result<&MusicTrack, String> {
        self.music
            .get(key)
            .ok_or_else(|| format!("Unknown music key '{key}'"))
    }
}

/// Looping music playback over the default audio output device.
///
/// The output stream handle must stay alive for as long as anything plays,
/// so the player owns it alongside the active sink.
pub struct MusicPlayer {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    current: Option<(Arc<str>, Sink)>,
}

impl MusicPlayer {
    pub fn new() -> Result<Self, String> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| format!("Failed to open audio output device: {e}"))?;
        Ok(Self {
            _stream: stream,
            stream_handle,
            current: None,
        })
    }

    /// Start looping the track stored under `key`, replacing whatever was
    /// playing. Fails on an unknown key; the caller decides whether that
    /// is fatal.
    pub fn play(&mut self, assets: &Assets, key: &str, volume: f32) -> Result<(), String> {
        let track = assets.music(key)?;
        let source = Decoder::new(Cursor::new(track.bytes.clone()))
            .map_err(|e| format!("Failed to decode music '{key}': {e}"))?
            .repeat_infinite();

        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| format!("Failed to create audio sink for '{key}': {e}"))?;
        sink.set_volume(volume);
        sink.append(source);

        if let Some((_, old)) = self.current.take() {
            old.stop();
        }
        self.current = Some((Arc::from(key), sink));
        log::info!("Playing music '{key}' at volume {volume}");
        Ok(())
    }

    pub fn status_label(&self) -> String {
        match &self.current {
            Some((key, _)) => format!("music: {key}"),
            None => "music: stopped".to_string(),
        }
    }
}
