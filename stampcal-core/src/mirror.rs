//! In-memory mirror of the signed-in user's calendars and stamps.
//!
//! The mirror holds three caches: the calendar list, the stamp list, and
//! the details of at most one selected calendar. Every operation calls the
//! remote store and then merges the result into the caches. On failure the
//! error is returned and the caches are left exactly as they were.
//!
//! Readers get `Arc` snapshots. A cache is never modified in place: each
//! change installs a new value, so a caller can tell a snapshot is stale
//! with [`Arc::ptr_eq`]. [`Mirror::subscribe`] yields a revision counter
//! that is bumped after every change.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::calendar::{CalendarDetails, CalendarSummary, NewCalendar};
use crate::error::{StampcalResult, StoreError};
use crate::event::{CalendarEvent, NewEvent, StampedEvent, encode_day};
use crate::remote::{Collection, DocumentId, Filter, Identity, RemoteStore, fields, to_fields};
use crate::stamp::{EventStamp, NewStamp};
use crate::theme::Theme;
use crate::validation;

#[derive(Default)]
struct Caches {
    calendars: Arc<Vec<CalendarSummary>>,
    stamps: Arc<Vec<EventStamp>>,
    stamps_loaded: bool,
    selected: Option<Arc<CalendarDetails>>,
}

pub struct Mirror {
    store: Arc<dyn RemoteStore>,
    owner: Identity,
    caches: Mutex<Caches>,
    /// Held while the selected slot is being loaded or appended to.
    selection: tokio::sync::Mutex<()>,
    revision: watch::Sender<u64>,
}

impl Mirror {
    /// Create a mirror for `owner` and load the stamp cache.
    ///
    /// A failed stamp load is logged and leaves the cache empty; call
    /// [`Mirror::reload_stamps`] to retry.
    pub async fn open(store: Arc<dyn RemoteStore>, owner: Identity) -> Self {
        let mirror = Mirror::new(store, owner);
        if let Err(e) = mirror.reload_stamps().await {
            warn!(error = %e, "initial stamp load failed");
        }
        mirror
    }

    /// Create a mirror with empty caches, without touching the store.
    pub fn new(store: Arc<dyn RemoteStore>, owner: Identity) -> Self {
        let (revision, _) = watch::channel(0);
        Mirror {
            store,
            owner,
            caches: Mutex::new(Caches::default()),
            selection: tokio::sync::Mutex::new(()),
            revision,
        }
    }

    pub fn owner(&self) -> &Identity {
        &self.owner
    }

    // SNAPSHOTS:

    pub fn calendars(&self) -> Arc<Vec<CalendarSummary>> {
        Arc::clone(&self.caches().calendars)
    }

    pub fn stamps(&self) -> Arc<Vec<EventStamp>> {
        Arc::clone(&self.caches().stamps)
    }

    pub fn selected_calendar(&self) -> Option<Arc<CalendarDetails>> {
        self.caches().selected.clone()
    }

    /// Whether the stamp list has been loaded from the store at least once.
    pub fn stamps_loaded(&self) -> bool {
        self.caches().stamps_loaded
    }

    /// Receiver whose value changes whenever a cache does.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Look a stamp up in the cache. Never calls the store.
    pub fn stamp(&self, id: &str) -> Option<EventStamp> {
        self.caches().stamps.iter().find(|s| s.id == id).cloned()
    }

    // RELOADS:

    /// Replace the calendar list with the owner's calendars.
    pub async fn reload_calendars(&self) -> StampcalResult<Arc<Vec<CalendarSummary>>> {
        let calendars: Vec<CalendarSummary> = self
            .list_owned(Collection::Calendars)
            .await
            .inspect_err(|e| warn!(error = %e, "failed to reload calendars"))?;
        debug!(count = calendars.len(), "reloaded calendars");

        let calendars = Arc::new(calendars);
        self.update(|caches| caches.calendars = Arc::clone(&calendars));
        Ok(calendars)
    }

    /// Replace the stamp list with the owner's stamps.
    pub async fn reload_stamps(&self) -> StampcalResult<Arc<Vec<EventStamp>>> {
        let stamps: Vec<EventStamp> = self
            .list_owned(Collection::Stamps)
            .await
            .inspect_err(|e| warn!(error = %e, "failed to reload stamps"))?;
        debug!(count = stamps.len(), "reloaded stamps");

        let stamps = Arc::new(stamps);
        self.update(|caches| {
            caches.stamps = Arc::clone(&stamps);
            caches.stamps_loaded = true;
        });
        Ok(stamps)
    }

    // SELECTION:

    /// Make `id` the selected calendar.
    ///
    /// If `id` is already selected the current details are returned without
    /// contacting the store. Use [`Mirror::refresh_calendar`] to force a
    /// reload. Stamps are joined at render time against [`Mirror::stamps`],
    /// so the stamp cache should be fresh before calling this.
    pub async fn select_calendar(&self, id: &str) -> StampcalResult<Arc<CalendarDetails>> {
        let _selection = self.selection.lock().await;

        if let Some(current) = self.selected_calendar().filter(|c| c.id() == id) {
            debug!(calendar = id, "calendar already selected");
            return Ok(current);
        }

        self.load_selected(id).await
    }

    /// Reload `id` from the store and make it the selected calendar.
    pub async fn refresh_calendar(&self, id: &str) -> StampcalResult<Arc<CalendarDetails>> {
        let _selection = self.selection.lock().await;
        self.load_selected(id).await
    }

    async fn load_selected(&self, id: &str) -> StampcalResult<Arc<CalendarDetails>> {
        let details = self
            .fetch_details(id)
            .await
            .inspect_err(|e| warn!(calendar = id, error = %e, "failed to load calendar"))?;

        for event in &details.events {
            if self.stamp(&event.stamp_id).is_none() {
                debug!(event = %event.id, stamp = %event.stamp_id, "event stamp not in cache");
            }
        }
        debug!(calendar = id, events = details.events.len(), "selected calendar");

        let details = Arc::new(details);
        self.update(|caches| caches.selected = Some(Arc::clone(&details)));
        Ok(details)
    }

    async fn fetch_details(&self, id: &str) -> StampcalResult<CalendarDetails> {
        let summary: CalendarSummary = self
            .store
            .get_document(Collection::Calendars, id)
            .await?
            .decode(Collection::Calendars)?;

        let events = self
            .store
            .list_documents(Collection::Events, &[Filter::equal(fields::CALENDAR, id)])
            .await?
            .into_iter()
            .map(|doc| doc.decode::<CalendarEvent>(Collection::Events))
            .collect::<StampcalResult<Vec<_>>>()?;

        Ok(CalendarDetails { summary, events })
    }

    // CREATION:

    /// Create a calendar and append it to the calendar list.
    ///
    /// The title is trimmed; a blank title is rejected before the store is
    /// contacted.
    pub async fn create_calendar(
        &self,
        title: &str,
        theme: &Theme,
    ) -> StampcalResult<CalendarSummary> {
        let title = validation::calendar_title(title)?;

        let fields = to_fields(
            Collection::Calendars,
            &NewCalendar {
                title,
                theme: theme.as_str(),
                user_id: &self.owner.id,
            },
        )?;
        let mut calendar: CalendarSummary = self
            .store
            .create_document(Collection::Calendars, &DocumentId::unique(), fields)
            .await
            .inspect_err(|e| warn!(error = %e, "failed to create calendar"))?
            .decode(Collection::Calendars)?;
        if calendar.owner_id.is_empty() {
            calendar.owner_id = self.owner.id.clone();
        }

        self.update(|caches| {
            let mut calendars = Vec::clone(&caches.calendars);
            calendars.push(calendar.clone());
            caches.calendars = Arc::new(calendars);
        });
        Ok(calendar)
    }

    /// Create a stamp and append it to the stamp list.
    pub async fn create_stamp(&self, name: &str, emoji: &str) -> StampcalResult<EventStamp> {
        let (name, emoji) = validation::stamp(name, emoji)?;

        let fields = to_fields(
            Collection::Stamps,
            &NewStamp {
                name,
                event_emoji: emoji,
                user_id: &self.owner.id,
            },
        )?;
        let stamp: EventStamp = self
            .store
            .create_document(Collection::Stamps, &DocumentId::unique(), fields)
            .await
            .inspect_err(|e| warn!(error = %e, "failed to create stamp"))?
            .decode(Collection::Stamps)?;

        self.update(|caches| {
            let mut stamps = Vec::clone(&caches.stamps);
            stamps.push(stamp.clone());
            caches.stamps = Arc::new(stamps);
        });
        Ok(stamp)
    }

    /// Place `stamp_id` on `day` in `calendar_id`.
    ///
    /// When `calendar_id` is the selected calendar, new details with the
    /// event appended replace the selected slot. Otherwise only the store
    /// changes; selecting that calendar later picks the event up.
    pub async fn create_event(
        &self,
        calendar_id: &str,
        stamp_id: &str,
        day: NaiveDate,
    ) -> StampcalResult<CalendarEvent> {
        let fields = to_fields(
            Collection::Events,
            &NewEvent {
                date: encode_day(day),
                user_id: &self.owner.id,
                cal_id: calendar_id,
                stamp_id,
            },
        )?;
        let event: CalendarEvent = self
            .store
            .create_document(Collection::Events, &DocumentId::unique(), fields)
            .await
            .inspect_err(|e| warn!(calendar = calendar_id, error = %e, "failed to create event"))?
            .decode(Collection::Events)?;

        let _selection = self.selection.lock().await;
        let appended = self.update_if(|caches| {
            let updated = caches
                .selected
                .as_ref()
                .filter(|selected| selected.id() == calendar_id)
                .filter(|selected| !selected.contains_event(&event.id))
                .map(|selected| Arc::new(selected.with_event(event.clone())));
            match updated {
                Some(details) => {
                    caches.selected = Some(details);
                    true
                }
                None => false,
            }
        });
        debug!(calendar = calendar_id, event = %event.id, appended, "created event");

        Ok(event)
    }

    // POINT LOOKUPS:

    /// Fetch one event and resolve its stamp.
    ///
    /// The stamp comes from the cache when present, otherwise from the
    /// store. `Ok(None)` means the event or its stamp does not exist.
    pub async fn event_with_stamp(&self, id: &str) -> StampcalResult<Option<StampedEvent>> {
        let event: CalendarEvent = match self.store.get_document(Collection::Events, id).await {
            Ok(doc) => doc.decode(Collection::Events)?,
            Err(StoreError::NotFound) => return Ok(None),
            Err(e) => {
                warn!(event = id, error = %e, "failed to fetch event");
                return Err(e.into());
            }
        };

        let stamp = match self.stamp(&event.stamp_id) {
            Some(stamp) => stamp,
            None => {
                debug!(stamp = %event.stamp_id, "stamp not cached, fetching");
                match self
                    .store
                    .get_document(Collection::Stamps, &event.stamp_id)
                    .await
                {
                    Ok(doc) => doc.decode(Collection::Stamps)?,
                    Err(StoreError::NotFound) => return Ok(None),
                    Err(e) => {
                        warn!(stamp = %event.stamp_id, error = %e, "failed to fetch stamp");
                        return Err(e.into());
                    }
                }
            }
        };

        Ok(Some(StampedEvent { event, stamp }))
    }

    // HELPERS:

    async fn list_owned<T: serde::de::DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> StampcalResult<Vec<T>> {
        self.store
            .list_documents(collection, &[Filter::equal(fields::OWNER, &self.owner.id)])
            .await?
            .into_iter()
            .map(|doc| doc.decode(collection))
            .collect()
    }

    fn caches(&self) -> MutexGuard<'_, Caches> {
        self.caches.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, apply: impl FnOnce(&mut Caches)) {
        self.update_if(|caches| {
            apply(caches);
            true
        });
    }

    /// Apply `apply` and bump the revision if it reports a change.
    fn update_if(&self, apply: impl FnOnce(&mut Caches) -> bool) -> bool {
        let changed = apply(&mut self.caches());
        if changed {
            self.revision.send_modify(|revision| *revision += 1);
        }
        changed
    }
}
