//! Fixed-capacity voice pool.
//!
//! Voices live in one array sized at startup. Free voices are tracked by an
//! explicit stack of indices, so allocate and release are a pop and a push
//! and never touch the allocator.

use log::{trace, warn};

use crate::dsp::oscillator::Oscillator;

/// Index of a voice slot in a `VoicePool`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoiceId(usize);

impl VoiceId {
    pub fn index(self) -> usize {
        self.0
    }
}

pub struct VoicePool {
    voices: Vec<Oscillator>,
    /// Stack of free slots; the top is handed out next.
    free: Vec<VoiceId>,
    on_free_list: Vec<bool>,
}

impl VoicePool {
    /// Build `capacity` idle voices, all on the free list.
    ///
    /// Slot 0 is allocated first, then slot 1, and so on.
    pub fn new(capacity: usize) -> Self {
        Self {
            voices: (0..capacity).map(|_| Oscillator::new()).collect(),
            free: (0..capacity).rev().map(VoiceId).collect(),
            on_free_list: vec![true; capacity],
        }
    }

    /// Take a voice off the free list, or `None` when every voice is busy.
    pub fn allocate(&mut self) -> Option<VoiceId> {
        let id = self.free.pop()?;
        self.on_free_list[id.0] = false;
        trace!("allocated voice {}", id.0);
        Some(id)
    }

    /// Put a voice back on the free list.
    ///
    /// Only voices that reported `poll_stopped` should come back. Releasing a
    /// voice that is already free is ignored.
    pub fn release(&mut self, id: VoiceId) -> bool {
        let Some(free) = self.on_free_list.get_mut(id.0) else {
            warn!("released unknown voice {}", id.0);
            return false;
        };
        if *free {
            warn!("voice {} released twice", id.0);
            return false;
        }

        *free = true;
        self.free.push(id);
        trace!("released voice {}", id.0);
        true
    }

    pub fn get(&self, id: VoiceId) -> &Oscillator {
        &self.voices[id.0]
    }

    pub fn get_mut(&mut self, id: VoiceId) -> &mut Oscillator {
        &mut self.voices[id.0]
    }

    /// Slot ids in fixed order.
    pub fn ids(&self) -> impl Iterator<Item = VoiceId> + 'static {
        (0..self.voices.len()).map(VoiceId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (VoiceId, &Oscillator)> {
        self.voices.iter().enumerate().map(|(i, v)| (VoiceId(i), v))
    }

    pub fn is_free(&self, id: VoiceId) -> bool {
        self.on_free_list.get(id.0).copied().unwrap_or(false)
    }

    pub fn capacity(&self) -> usize {
        self.voices.len()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Voices currently bound to a note or still ringing out.
    pub fn busy_count(&self) -> usize {
        self.capacity() - self.free_count()
    }
}
