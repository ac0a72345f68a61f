//! Microphone and rear-camera capture for an active SOS session. The
//! recorder hands a chunk to the callback every 30 seconds.
//
// TODO: ship chunks to the evidence storage bucket and register the
// resulting URLs through the alert media endpoint; chunks are only held
// in session state until then.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::js_sys::{Object, Reflect};
use web_sys::{Blob, BlobEvent, MediaRecorder, MediaStream, MediaStreamConstraints, RecordingState};
use yew::Callback;

/// MediaRecorder timeslice: one chunk every 30 seconds.
const CHUNK_MS: i32 = 30_000;

pub struct Recorder {
    recorder: MediaRecorder,
    stream: MediaStream,
    _on_data: Closure<dyn FnMut(BlobEvent)>,
}

impl Recorder {
    /// Requests the microphone and starts chunked capture.
    pub async fn start_audio(on_chunk: Callback<Blob>) -> Result<Self, JsValue> {
        let constraints = MediaStreamConstraints::new();
        constraints.set_audio(&JsValue::TRUE);
        Self::start(constraints, on_chunk).await
    }

    /// Requests the environment-facing camera. Callers treat failure as
    /// non-fatal; audio keeps running without video.
    pub async fn start_rear_video(on_chunk: Callback<Blob>) -> Result<Self, JsValue> {
        let video = Object::new();
        Reflect::set(&video, &"facingMode".into(), &"environment".into())?;
        let constraints = MediaStreamConstraints::new();
        constraints.set_video(video.as_ref());
        Self::start(constraints, on_chunk).await
    }

    async fn start(
        constraints: MediaStreamConstraints,
        on_chunk: Callback<Blob>,
    ) -> Result<Self, JsValue> {
        let devices = web_sys::window()
            .ok_or_else(|| JsValue::from_str("no window"))?
            .navigator()
            .media_devices()?;
        let stream: MediaStream =
            JsFuture::from(devices.get_user_media_with_constraints(&constraints)?)
                .await?
                .dyn_into()?;

        let recorder = MediaRecorder::new_with_media_stream(&stream)?;
        let on_data = Closure::new(move |event: BlobEvent| {
            if let Some(blob) = event.data() {
                if blob.size() > 0.0 {
                    on_chunk.emit(blob);
                }
            }
        });
        recorder.set_ondataavailable(Some(on_data.as_ref().unchecked_ref()));
        recorder.start_with_time_slice(CHUNK_MS)?;

        Ok(Self {
            recorder,
            stream,
            _on_data: on_data,
        })
    }

    /// Stops capture and releases the device, not just the recorder.
    pub fn stop(&self) {
        if self.recorder.state() != RecordingState::Inactive {
            let _ = self.recorder.stop();
        }
        for track in self.stream.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<web_sys::MediaStreamTrack>() {
                track.stop();
            }
        }
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        self.stop();
    }
}
