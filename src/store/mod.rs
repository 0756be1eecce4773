pub mod json_store;
pub mod schema;

use anyhow::Result;

use crate::session::quiz::QuizSession;

/// Holds the quiz between turns: loaded at turn start, saved at turn end.
pub trait SessionStore {
    fn load(&self) -> Result<Option<QuizSession>>;
    fn save(&mut self, session: &QuizSession) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}

#[derive(Default)]
pub struct MemoryStore {
    slot: Option<QuizSession>,
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<Option<QuizSession>> {
        Ok(self.slot.clone())
    }

    fn save(&mut self, session: &QuizSession) -> Result<()> {
        self.slot = Some(session.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.slot = None;
        Ok(())
    }
}

impl<S: SessionStore + ?Sized> SessionStore for Box<S> {
    fn load(&self) -> Result<Option<QuizSession>> {
        (**self).load()
    }

    fn save(&mut self, session: &QuizSession) -> Result<()> {
        (**self).save(session)
    }

    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }
}
