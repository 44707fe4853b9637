use std::time::{SystemTime, UNIX_EPOCH};

/// Horodatage en millisecondes depuis l'epoch Unix.
pub type Millis = u64;

/// Délai minimal entre deux placements réussis.
pub const COOLDOWN_MS: Millis = 60_000;

/// Source de temps du gestionnaire de grille.
///
/// # Example
/// ```
/// use pb_core::clock::{Clock, Millis};
///
/// struct Fixed(Millis);
/// impl Clock for Fixed {
///     fn now_ms(&self) -> Millis { self.0 }
/// }
/// assert_eq!(Fixed(42).now_ms(), 42);
/// ```
pub trait Clock {
    /// Instant courant, en millisecondes.
    fn now_ms(&self) -> Millis;
}

/// Horloge murale du système.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        // Une horloge système antérieure à 1970 se lit comme l'epoch.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as Millis)
    }
}

/// Horloge de cooldown : mémorise le dernier placement réussi.
///
/// `None` signifie « jamais placé ». Les états « prêt » et « en attente » sont
/// dérivés de `now - last_placed`, jamais stockés. Non persistée.
///
/// # Example
/// ```
/// use pb_core::clock::Cooldown;
/// let mut cd = Cooldown::default();
/// assert!(cd.is_ready(0));
/// cd.mark(1_000);
/// assert!(!cd.is_ready(30_000));
/// assert_eq!(cd.remaining_ms(31_000), 30_000);
/// assert!(cd.is_ready(61_000));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Cooldown {
    last_placed: Option<Millis>,
}

impl Cooldown {
    /// Instant du dernier placement réussi.
    #[inline]
    #[must_use]
    pub fn last_placed(&self) -> Option<Millis> {
        self.last_placed
    }

    /// Milliseconds still to wait at `now`; 0 when ready.
    ///
    /// A `now` earlier than the last placement counts as zero elapsed time.
    #[must_use]
    pub fn remaining_ms(&self, now: Millis) -> Millis {
        match self.last_placed {
            None => 0,
            Some(last) => {
                let elapsed = now.saturating_sub(last);
                COOLDOWN_MS.saturating_sub(elapsed)
            }
        }
    }

    /// Remaining wait in whole seconds, truncated.
    #[inline]
    #[must_use]
    pub fn remaining_secs(&self, now: Millis) -> u64 {
        self.remaining_ms(now) / 1000
    }

    /// `true` si un placement serait accepté à `now`.
    #[inline]
    #[must_use]
    pub fn is_ready(&self, now: Millis) -> bool {
        self.remaining_ms(now) == 0
    }

    /// Enregistre un placement réussi.
    #[inline]
    pub fn mark(&mut self, now: Millis) {
        self.last_placed = Some(now);
    }
}
