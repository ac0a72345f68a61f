use gloo_console::{error, info, warn};
use gloo_timers::callback::{Interval, Timeout};
use route_guard_lib::location::LocationSample;
use route_guard_lib::sos::{SosCountdown, SosDispatch, SosPhase, format_clock};
use wasm_bindgen_futures::spawn_local;
use web_sys::Blob;
use yew::prelude::*;

use crate::api;
use crate::geolocation::{self, Cadence, GeoError, PositionFeed};
use crate::media::Recorder;
use crate::tracking::LOCATION_TICK_MS;
use crate::util::confirm;
use crate::{ToastKind, ToastMsg};

const COUNTDOWN_TICK_MS: u32 = 1_000;
const RECORDING_TICK_MS: u32 = 1_000;

/// How long the recording indicator shows before switching to the
/// responder-notified screen.
const NOTIFIED_DELAY_MS: u32 = 3_000;

pub enum SosMsg {
    Trigger,
    CountdownTick,
    Cancel,
    Activated(Result<SosDispatch, String>),
    Fix(LocationSample),
    GeoFailure(GeoError),
    AudioStarted(Option<Recorder>),
    VideoStarted(Option<Recorder>),
    AudioChunk(Blob),
    VideoChunk(Blob),
    RecordingTick,
    ShowNotified,
    End,
}

#[derive(PartialEq, Properties, Clone)]
pub struct Props {
    pub on_toast: Callback<ToastMsg>,
}

/// The whole emergency flow in one place: countdown gate, alert creation,
/// 5-second location updates, chunked audio/video capture and the
/// responder-notified screen. Every timer, feed and recorder is owned
/// here, so ending the session (or a failed activation) tears all of it
/// down.
pub struct SosOverlay {
    phase: SosPhase,
    countdown: SosCountdown,
    countdown_timer: Option<Interval>,
    dispatch: Option<SosDispatch>,
    feed: Option<PositionFeed>,
    recording_timer: Option<Interval>,
    elapsed_secs: u32,
    audio: Option<Recorder>,
    video: Option<Recorder>,
    audio_chunks: Vec<Blob>,
    video_chunks: Vec<Blob>,
    notified: bool,
    notified_delay: Option<Timeout>,
}

impl SosOverlay {
    fn reset(&mut self) {
        self.phase = SosPhase::Idle;
        self.countdown = SosCountdown::new();
        self.countdown_timer = None;
        self.dispatch = None;
        self.feed = None;
        self.recording_timer = None;
        self.elapsed_secs = 0;
        self.audio = None;
        self.video = None;
        self.audio_chunks.clear();
        self.video_chunks.clear();
        self.notified = false;
        self.notified_delay = None;
    }

    fn toast(&self, ctx: &Context<Self>, message: impl Into<String>, kind: ToastKind) {
        ctx.props().on_toast.emit((message.into(), kind));
    }
}

impl Component for SosOverlay {
    type Message = SosMsg;
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            phase: SosPhase::Idle,
            countdown: SosCountdown::new(),
            countdown_timer: None,
            dispatch: None,
            feed: None,
            recording_timer: None,
            elapsed_secs: 0,
            audio: None,
            video: None,
            audio_chunks: Vec::new(),
            video_chunks: Vec::new(),
            notified: false,
            notified_delay: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            SosMsg::Trigger => {
                if self.phase != SosPhase::Idle {
                    return false;
                }
                self.phase = SosPhase::CountingDown;
                self.countdown = SosCountdown::new();
                let link = ctx.link().clone();
                self.countdown_timer = Some(Interval::new(COUNTDOWN_TICK_MS, move || {
                    link.send_message(SosMsg::CountdownTick);
                }));
                true
            }
            SosMsg::CountdownTick => {
                if self.phase != SosPhase::CountingDown {
                    return false;
                }
                if !self.countdown.tick() {
                    return true;
                }
                // Countdown hit zero: the activation is on.
                self.countdown_timer = None;
                self.phase = SosPhase::Active;
                self.elapsed_secs = 0;
                let link = ctx.link().clone();
                self.recording_timer = Some(Interval::new(RECORDING_TICK_MS, move || {
                    link.send_message(SosMsg::RecordingTick);
                }));

                info!("🚨 SOS activated");
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = async {
                        let position = geolocation::current_position()
                            .await
                            .map_err(|e| e.to_string())?;
                        api::trigger_sos(&position).await.map_err(|e| e.to_string())
                    }
                    .await;
                    link.send_message(SosMsg::Activated(result));
                });
                true
            }
            SosMsg::Cancel => {
                // Backing out of the countdown has no side effects: no
                // alert was created and nothing was started.
                if self.phase != SosPhase::CountingDown {
                    return false;
                }
                self.countdown_timer = None;
                self.phase = SosPhase::Idle;
                self.countdown = SosCountdown::new();
                true
            }
            SosMsg::Activated(Ok(dispatch)) => {
                if self.phase != SosPhase::Active {
                    return false;
                }
                info!(format!("Alert created: {}", dispatch.alert_id));
                self.dispatch = Some(dispatch);

                // Location updates may flow now that the alert id exists.
                let on_fix = ctx.link().callback(SosMsg::Fix);
                let on_error = ctx.link().callback(SosMsg::GeoFailure);
                match PositionFeed::start(
                    Cadence::Poll {
                        interval_ms: LOCATION_TICK_MS,
                    },
                    on_fix,
                    on_error,
                ) {
                    Ok(feed) => self.feed = Some(feed),
                    Err(e) => {
                        warn!(format!("SOS location updates unavailable: {e}"));
                        self.toast(ctx, e.to_string(), ToastKind::Warning);
                    }
                }

                let link = ctx.link().clone();
                let on_chunk = ctx.link().callback(SosMsg::AudioChunk);
                spawn_local(async move {
                    let recorder = Recorder::start_audio(on_chunk).await.ok();
                    link.send_message(SosMsg::AudioStarted(recorder));
                });

                let link = ctx.link().clone();
                self.notified_delay = Some(Timeout::new(NOTIFIED_DELAY_MS, move || {
                    link.send_message(SosMsg::ShowNotified);
                }));
                true
            }
            SosMsg::Activated(Err(message)) => {
                // A failed alert creation aborts the whole activation;
                // nothing may keep running without an alert id.
                error!(format!("SOS activation failed: {message}"));
                self.reset();
                self.toast(
                    ctx,
                    "Failed to activate SOS. Please try again or call emergency services directly.",
                    ToastKind::Error,
                );
                true
            }
            SosMsg::Fix(sample) => {
                let Some(dispatch) = &self.dispatch else {
                    return false;
                };
                let alert_id = dispatch.alert_id.clone();
                spawn_local(async move {
                    if let Err(e) = api::push_sos_location(&alert_id, &sample).await {
                        warn!(format!("SOS location push failed: {e}"));
                    }
                });
                false
            }
            SosMsg::GeoFailure(e) => {
                warn!(format!("SOS location error: {e}"));
                false
            }
            SosMsg::AudioStarted(Some(recorder)) => {
                info!("🎤 Audio recording started");
                self.audio = Some(recorder);
                // Video is strictly best-effort on top of audio.
                let link = ctx.link().clone();
                let on_chunk = ctx.link().callback(SosMsg::VideoChunk);
                spawn_local(async move {
                    let recorder = Recorder::start_rear_video(on_chunk).await.ok();
                    link.send_message(SosMsg::VideoStarted(recorder));
                });
                false
            }
            SosMsg::AudioStarted(None) => {
                self.toast(
                    ctx,
                    "Could not access microphone/camera. SOS will continue with GPS tracking only.",
                    ToastKind::Warning,
                );
                false
            }
            SosMsg::VideoStarted(Some(recorder)) => {
                info!("📹 Video recording started");
                self.video = Some(recorder);
                false
            }
            SosMsg::VideoStarted(None) => {
                info!("Video not available, continuing with audio only");
                false
            }
            SosMsg::AudioChunk(blob) => {
                info!(format!("Audio chunk ready: {} bytes", blob.size()));
                self.audio_chunks.push(blob);
                false
            }
            SosMsg::VideoChunk(blob) => {
                info!(format!("Video chunk ready: {} bytes", blob.size()));
                self.video_chunks.push(blob);
                false
            }
            SosMsg::RecordingTick => {
                if self.phase != SosPhase::Active {
                    return false;
                }
                self.elapsed_secs += 1;
                true
            }
            SosMsg::ShowNotified => {
                self.notified = true;
                self.notified_delay = None;
                true
            }
            SosMsg::End => {
                if self.phase != SosPhase::Active {
                    return false;
                }
                if !confirm("Are you sure you want to end the emergency alert?") {
                    return false;
                }
                if let Some(dispatch) = &self.dispatch {
                    let alert_id = dispatch.alert_id.clone();
                    spawn_local(async move {
                        if let Err(e) = api::resolve_sos(&alert_id).await {
                            warn!(format!("SOS resolve failed: {e}"));
                        }
                    });
                }
                // Dropping the feed and recorders stops polling and
                // releases the devices.
                self.reset();
                self.toast(ctx, "Emergency alert ended. Stay safe!", ToastKind::Success);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let trigger = link.callback(|_| SosMsg::Trigger);
        let cancel = link.callback(|_| SosMsg::Cancel);
        let end = link.callback(|_| SosMsg::End);

        html! {
            <>
                <button
                    class={classes!("sos-trigger", (self.phase == SosPhase::Active).then_some("active"))}
                    onclick={trigger}
                >
                    {"🆘"}
                </button>

                if self.phase == SosPhase::CountingDown {
                    <div class="sos-countdown active">
                        <div class="countdown-card">
                            <div class="countdown-title">{"Emergency alert in"}</div>
                            <div class="countdown-number">{self.countdown.remaining()}</div>
                            <button class="btn-secondary" onclick={cancel}>{"Cancel"}</button>
                        </div>
                    </div>
                }

                if self.phase == SosPhase::Active && !self.notified {
                    <div class="recording-indicator active">
                        <div class="recording-dot"></div>
                        <span>{format!("Recording {}", format_clock(self.elapsed_secs))}</span>
                        <button class="btn-secondary" onclick={end.clone()}>{"End"}</button>
                    </div>
                }

                if self.phase == SosPhase::Active && self.notified {
                    {self.notified_screen(ctx)}
                }
            </>
        }
    }
}

impl SosOverlay {
    fn notified_screen(&self, ctx: &Context<Self>) -> Html {
        let end = ctx.link().callback(|_| SosMsg::End);
        let Some(dispatch) = &self.dispatch else {
            return html! {};
        };

        if dispatch.backup_mode {
            html! {
                <div class="police-notified active backup">
                    <div class="notified-icon">{"⚠️"}</div>
                    <h2 class="notified-title">{"No Nearby Police Found"}</h2>
                    <p class="notified-message">
                        {dispatch.message.clone().unwrap_or_default()}
                    </p>
                    <strong>{"Call Emergency Services Immediately:"}</strong>
                    <div class="notified-details">
                        if let Some(station) = &dispatch.nearest_station {
                            <div class="station-card">
                                {format!("🏢 Nearest Station: {}", station.name)}
                                <span class="station-distance">
                                    {format!("Distance: {}", station.distance)}
                                </span>
                            </div>
                        }
                        { for dispatch.emergency_contacts.iter().map(|contact| html! {
                            <a class="contact-call" href={format!("tel:{}", contact.number)}>
                                {format!("📞 Call {} ({})", contact.name, contact.number)}
                            </a>
                        })}
                    </div>
                    <button class="btn-danger" onclick={end}>{"End Alert"}</button>
                </div>
            }
        } else {
            let officer = dispatch
                .officer
                .as_ref()
                .map(|officer| officer.name.clone())
                .unwrap_or_else(|| "Dispatch".into());
            html! {
                <div class="police-notified active">
                    <div class="notified-icon">{"🚓"}</div>
                    <h2 class="notified-title">{"Police Notified"}</h2>
                    <div class="notified-details">
                        <div>{format!("Responding officer: {officer}")}</div>
                        <div>{"ETA: Calculating..."}</div>
                        <div>{"Alert status: Active"}</div>
                        <div>{format!("Recording {}", format_clock(self.elapsed_secs))}</div>
                    </div>
                    <button class="btn-danger" onclick={end}>{"End Alert"}</button>
                </div>
            }
        }
    }
}
