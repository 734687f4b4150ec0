//! Practice session controller.
//!
//! Owns the transcript and the active/thinking flags for one practice chat.
//! Every service call is tagged with the session generation it started in;
//! a result that comes back after a restart or persona switch is dropped.

use crate::ai::service::AiModelService;
use crate::error::{CoachError, Result};
use crate::practice::persona::{PracticeMessage, PracticePersona, PracticeTurn};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct SessionState {
    session_id: String,
    persona: PracticePersona,
    transcript: Vec<PracticeMessage>,
    active: bool,
    thinking: bool,
    generation: u64,
}

pub struct PracticeSession {
    service: Arc<dyn AiModelService>,
    state: RwLock<SessionState>,
}

impl PracticeSession {
    pub fn new(service: Arc<dyn AiModelService>) -> Self {
        Self {
            service,
            state: RwLock::new(SessionState {
                session_id: Uuid::new_v4().to_string(),
                persona: PracticePersona::default(),
                transcript: Vec::new(),
                active: false,
                thinking: false,
                generation: 0,
            }),
        }
    }

    pub fn with_persona(mut self, persona: PracticePersona) -> Self {
        self.state.get_mut().persona = persona;
        self
    }

    /// Begin a fresh session with the selected persona and fetch its opening line.
    pub async fn start_or_restart(&self) -> Result<()> {
        let (generation, persona) = {
            let mut s = self.state.write().await;
            s.generation += 1;
            s.session_id = Uuid::new_v4().to_string();
            s.transcript.clear();
            s.active = true;
            s.thinking = true;
            tracing::info!(session = %s.session_id, persona = %s.persona, "practice session started");
            (s.generation, s.persona)
        };

        let opening = self.service.get_practice_opening_line(persona).await;

        let mut s = self.state.write().await;
        if s.generation != generation {
            tracing::debug!(generation, "discarding stale opening line");
            return Ok(());
        }
        s.thinking = false;
        match opening {
            Ok(line) => {
                s.transcript.push(PracticeMessage::persona(persona, &line));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not start practice session");
                s.transcript
                    .push(PracticeMessage::system(&format!("Error starting session: {e}")));
                s.active = false;
                Err(e)
            }
        }
    }

    /// Switch persona. An active session restarts with the new persona.
    pub async fn select_persona(&self, persona: PracticePersona) -> Result<()> {
        let active = {
            let mut s = self.state.write().await;
            s.persona = persona;
            s.active
        };
        if active {
            self.start_or_restart().await
        } else {
            Ok(())
        }
    }

    /// Send the user's reply and record the persona's answer plus coach feedback.
    ///
    /// Returns `Ok(None)` when the session moved on while the call was running.
    pub async fn send_user_reply(&self, text: &str) -> Result<Option<PracticeTurn>> {
        let (generation, persona, history) = {
            let mut s = self.state.write().await;
            if !s.active {
                return Err(CoachError::SessionInactive);
            }
            if text.trim().is_empty() {
                return Err(CoachError::BlankReply);
            }
            if s.thinking {
                return Err(CoachError::RequestInFlight);
            }
            s.transcript.push(PracticeMessage::user(text));
            s.thinking = true;
            (s.generation, s.persona, s.transcript.clone())
        };

        let reply = self
            .service
            .get_practice_response(text, persona, &history)
            .await;

        let mut s = self.state.write().await;
        if s.generation != generation {
            tracing::debug!(generation, "discarding stale practice reply");
            return Ok(None);
        }
        s.thinking = false;
        match reply {
            Ok(turn) => {
                s.transcript
                    .push(PracticeMessage::persona(persona, &turn.persona_response));
                if let Some(feedback) = &turn.feedback {
                    s.transcript.push(PracticeMessage::coach(feedback));
                }
                Ok(Some(turn))
            }
            Err(e) => {
                tracing::warn!(error = %e, "practice reply failed");
                s.transcript
                    .push(PracticeMessage::system(&format!("Error getting response: {e}")));
                Err(e)
            }
        }
    }

    /// Stop the session. In-flight results are discarded.
    pub async fn end(&self) {
        let mut s = self.state.write().await;
        s.generation += 1;
        s.active = false;
        s.thinking = false;
        tracing::info!(session = %s.session_id, "practice session ended");
    }

    pub async fn transcript(&self) -> Vec<PracticeMessage> {
        self.state.read().await.transcript.clone()
    }

    pub async fn persona(&self) -> PracticePersona {
        self.state.read().await.persona
    }

    pub async fn is_active(&self) -> bool {
        self.state.read().await.active
    }

    pub async fn is_thinking(&self) -> bool {
        self.state.read().await.thinking
    }

    pub async fn session_id(&self) -> String {
        self.state.read().await.session_id.clone()
    }
}
