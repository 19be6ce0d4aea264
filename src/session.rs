// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation session for one video.
//!
//! A session is created when the user picks a video and dropped when they
//! pick another. It owns everything that used to be loose UI state: the
//! store for the video's annotation directory, the working stroke set, the
//! current mode and the playback handle.
//!
//! Mode changes follow a two-state machine. Entering [`Mode::Annotating`]
//! pauses and locks playback and enables drawing. Leaving it commits the
//! working set (when there is anything in it) at the current playback
//! position, then clears it and hands playback back to the user.

use crate::error::{StoreError, StoreResult};
use crate::io::{
    media::Playback,
    selection::VideoSelection,
    store::{AnnotationStore, RecordEntry},
};
use crate::models::{annotation::Point, meta::MetaRecord};
use crate::strokes::StrokeCanvas;
use crate::util::geometry::seconds_to_timestamp;

/// Whether the user is watching or drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Viewing,
    Annotating,
}

pub struct Session {
    video: VideoSelection,
    store: AnnotationStore,
    canvas: StrokeCanvas,
    playback: Box<dyn Playback>,
    mode: Mode,
    records: Vec<RecordEntry>,
    meta: MetaRecord,
    /// Record loaded for editing, if any.
    editing: Option<String>,
}

impl Session {
    /// Open the annotation directory for a video and load its listing and
    /// metadata. Unknown weld types are shown as "Other".
    pub fn open(
        video: VideoSelection,
        playback: Box<dyn Playback>,
        weld_types: &[String],
    ) -> StoreResult<Self> {
        let store = AnnotationStore::new(video.annotation_dir.clone());
        let records = store.list()?;
        let meta = match store.get_meta() {
            Ok(meta) => meta,
            // A damaged header must not lock the user out of the annotations.
            Err(StoreError::RecordParse { name, source }) => {
                log::warn!("Ignoring unreadable {}, using defaults: {}", name, source);
                MetaRecord::default()
            }
            Err(e) => return Err(e),
        }
        .normalized(weld_types);

        log::info!(
            "Opened {} with {} annotations in {}",
            video.file_path.display(),
            records.len(),
            store.dir().display()
        );

        Ok(Self {
            video,
            store,
            canvas: StrokeCanvas::new(),
            playback,
            mode: Mode::Viewing,
            records,
            meta,
            editing: None,
        })
    }

    pub fn video(&self) -> &VideoSelection {
        &self.video
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn canvas(&self) -> &StrokeCanvas {
        &self.canvas
    }

    pub fn records(&self) -> &[RecordEntry] {
        &self.records
    }

    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn meta(&self) -> &MetaRecord {
        &self.meta
    }

    /// Title and weld type as edited in the UI. Saved with the next
    /// annotation or by [`Session::save_meta`].
    pub fn meta_mut(&mut self) -> &mut MetaRecord {
        &mut self.meta
    }

    /// Notes can only be edited while annotating.
    pub fn notes_mut(&mut self) -> Option<&mut String> {
        match self.mode {
            Mode::Annotating => Some(self.canvas.notes_mut()),
            Mode::Viewing => None,
        }
    }

    pub fn playback(&self) -> &dyn Playback {
        self.playback.as_ref()
    }

    pub fn playback_mut(&mut self) -> &mut dyn Playback {
        self.playback.as_mut()
    }

    /// Enter annotating mode with an empty working set.
    pub fn start_annotating(&mut self) {
        self.canvas.reset();
        self.editing = None;
        self.enter_annotating();
    }

    /// Load a stored record into the working set and annotate on top of it.
    ///
    /// Playback jumps to the record's timestamp so saving it again keeps
    /// the same key.
    pub fn load_for_edit(&mut self, name: &str) -> StoreResult<()> {
        let record = self.store.get(name)?;
        self.canvas.load(&record);
        self.playback.seek_ms(record.timestamp);
        self.editing = Some(name.to_string());
        self.enter_annotating();
        log::info!("Loaded annotation {} for editing", name);
        Ok(())
    }

    /// Leave annotating mode, saving the working set if it has content.
    ///
    /// Returns the stored name when something was saved. On failure the
    /// working set is kept and the session stays in annotating mode. Once
    /// the write succeeded the save is reported even if the listing cannot
    /// be reloaded.
    pub fn stop_annotating(&mut self) -> StoreResult<Option<String>> {
        if self.mode != Mode::Annotating {
            return Ok(None);
        }

        let saved = self.commit()?;
        self.canvas.reset();
        self.editing = None;
        self.enter_viewing();
        if saved.is_some() {
            self.refresh_after_change();
        }
        Ok(saved)
    }

    /// Save the working set at the current playback position, then the
    /// metadata. Empty working sets are not written.
    fn commit(&mut self) -> StoreResult<Option<String>> {
        if self.canvas.is_empty() {
            log::debug!("Nothing to save");
            return Ok(None);
        }
        let timestamp = seconds_to_timestamp(self.playback.position_secs());
        let record = self.canvas.to_record(timestamp);
        let name = self.store.commit_annotation(&record, &self.meta)?;
        Ok(Some(name))
    }

    /// Delete a stored record and drop back to viewing without saving.
    pub fn delete_record(&mut self, name: &str) -> StoreResult<()> {
        self.store.delete(name)?;
        self.canvas.reset();
        self.editing = None;
        if self.mode == Mode::Annotating {
            self.enter_viewing();
        }
        self.refresh_after_change();
        Ok(())
    }

    pub fn save_meta(&mut self) -> StoreResult<()> {
        self.store.put_meta(&self.meta)
    }

    /// Reload the record listing from disk.
    pub fn refresh(&mut self) -> StoreResult<()> {
        self.records = self.store.list()?;
        Ok(())
    }

    /// Reload the listing after a store change that already succeeded.
    /// The stale listing is kept if the directory cannot be read.
    fn refresh_after_change(&mut self) {
        if let Err(e) = self.refresh() {
            log::warn!(
                "Could not reload annotations in {}: {}",
                self.store.dir().display(),
                e
            );
        }
    }

    pub fn pointer_down(&mut self, color: &str, point: Point) {
        self.canvas.begin_stroke(color, point);
    }

    pub fn pointer_move(&mut self, point: Point) {
        self.canvas.extend_stroke(point);
    }

    pub fn pointer_up(&mut self) {
        if self.mode == Mode::Annotating {
            self.canvas.end_stroke();
        }
    }

    pub fn pointer_leave(&mut self) {
        self.canvas.end_stroke();
    }

    fn enter_annotating(&mut self) {
        self.playback.pause();
        self.canvas.set_enabled(true);
        self.mode = Mode::Annotating;
        log::debug!("Mode: annotating");
    }

    fn enter_viewing(&mut self) {
        self.canvas.set_enabled(false);
        self.playback.resume();
        self.mode = Mode::Viewing;
        log::debug!("Mode: viewing");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::media::VideoClock;
    use crate::io::store::META_FILE_NAME;

    fn weld_types() -> Vec<String> {
        ["Butt", "Fillet", "Other"].iter().map(|s| s.to_string()).collect()
    }

    fn open_session(tmp: &tempfile::TempDir) -> Session {
        let video = VideoSelection::from_video_path(tmp.path().join("weld1.mp4"));
        Session::open(video, Box::new(VideoClock::new(None)), &weld_types()).unwrap()
    }

    fn draw_line(session: &mut Session, color: &str) {
        session.pointer_down(color, Point::new(0.0, 0.0));
        session.pointer_move(Point::new(10.0, 5.0));
        session.pointer_up();
    }

    #[test]
    fn test_session_uses_derived_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let session = open_session(&tmp);
        assert_eq!(
            session.video().annotation_dir,
            tmp.path().join("weld1_annotations")
        );
        assert_eq!(session.mode(), Mode::Viewing);
        assert!(session.records().is_empty());
        assert_eq!(session.meta().weld_type, "Other");
    }

    #[test]
    fn test_annotate_and_save_at_playback_position() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = open_session(&tmp);
        session.playback_mut().seek_ms(1234);
        session.meta_mut().title = "Root pass".to_string();

        session.start_annotating();
        assert_eq!(session.mode(), Mode::Annotating);
        assert!(session.playback().is_locked());

        draw_line(&mut session, "#ff0000");
        session.notes_mut().unwrap().push_str("lack of fusion");

        let saved = session.stop_annotating().unwrap();
        assert_eq!(saved.as_deref(), Some("1234.json"));
        assert_eq!(session.mode(), Mode::Viewing);
        assert!(!session.playback().is_locked());
        assert!(session.canvas().is_empty());
        assert_eq!(session.records().len(), 1);
        assert_eq!(session.records()[0].timestamp, 1234);

        let meta = std::fs::read_to_string(session.video().annotation_dir.join(META_FILE_NAME))
            .unwrap();
        assert!(meta.contains("Root pass"));
    }

    #[test]
    fn test_empty_working_set_is_not_saved() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = open_session(&tmp);

        session.start_annotating();
        session.notes_mut().unwrap().push_str("   ");
        assert_eq!(session.stop_annotating().unwrap(), None);

        assert_eq!(session.mode(), Mode::Viewing);
        assert!(!session.video().annotation_dir.exists());
    }

    #[test]
    fn test_pointer_input_ignored_while_viewing() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = open_session(&tmp);

        draw_line(&mut session, "red");
        assert!(session.canvas().strokes().is_empty());
        assert!(session.notes_mut().is_none());
    }

    #[test]
    fn test_start_annotating_resets_working_set() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = open_session(&tmp);
        session.start_annotating();
        draw_line(&mut session, "red");

        session.start_annotating();
        assert!(session.canvas().strokes().is_empty());
    }

    #[test]
    fn test_load_for_edit_preloads_and_seeks() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = open_session(&tmp);
        session.playback_mut().seek_ms(4351);
        session.start_annotating();
        draw_line(&mut session, "blue");
        session.notes_mut().unwrap().push_str("crater crack");
        session.stop_annotating().unwrap();

        session.playback_mut().seek_ms(0);
        session.load_for_edit("4351.json").unwrap();

        assert_eq!(session.mode(), Mode::Annotating);
        assert_eq!(session.editing(), Some("4351.json"));
        assert_eq!(session.canvas().notes(), "crater crack");
        assert_eq!(session.canvas().strokes().len(), 1);
        assert_eq!(seconds_to_timestamp(session.playback().position_secs()), 4351);

        draw_line(&mut session, "green");
        session.stop_annotating().unwrap();

        assert_eq!(session.records().len(), 1);
        let store = AnnotationStore::new(session.video().annotation_dir.clone());
        let record = store.get("4351.json").unwrap();
        assert_eq!(record.strokes.len(), 2);
        assert_eq!(record.strokes[1].color, "green");
    }

    #[test]
    fn test_load_missing_record_keeps_mode() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = open_session(&tmp);
        let err = session.load_for_edit("77.json").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(session.mode(), Mode::Viewing);
    }

    #[test]
    fn test_record_removed_outside_app_is_not_found_then_dropped() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = open_session(&tmp);
        session.playback_mut().seek_ms(250);
        session.start_annotating();
        draw_line(&mut session, "red");
        session.stop_annotating().unwrap();
        assert_eq!(session.records().len(), 1);

        std::fs::remove_file(session.video().annotation_dir.join("250.json")).unwrap();
        assert!(session.load_for_edit("250.json").unwrap_err().is_not_found());
        assert!(session.delete_record("250.json").unwrap_err().is_not_found());

        session.refresh().unwrap();
        assert!(session.records().is_empty());
        assert_eq!(session.mode(), Mode::Viewing);
    }

    #[test]
    fn test_delete_while_annotating_discards_working_set() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = open_session(&tmp);
        session.playback_mut().seek_ms(500);
        session.start_annotating();
        draw_line(&mut session, "red");
        session.stop_annotating().unwrap();

        session.load_for_edit("500.json").unwrap();
        session.delete_record("500.json").unwrap();

        assert_eq!(session.mode(), Mode::Viewing);
        assert!(session.records().is_empty());
        assert!(session.canvas().is_empty());
        assert!(!session.video().annotation_dir.join("500.json").exists());
    }

    #[test]
    fn test_failed_delete_keeps_working_set() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = open_session(&tmp);
        session.start_annotating();
        draw_line(&mut session, "red");

        assert!(session.delete_record("1.json").unwrap_err().is_not_found());
        assert_eq!(session.mode(), Mode::Annotating);
        assert_eq!(session.canvas().strokes().len(), 1);
    }

    #[test]
    fn test_failed_save_keeps_working_set() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = open_session(&tmp);
        // A plain file where the annotation directory should go.
        std::fs::write(&session.video().annotation_dir, "occupied").unwrap();

        session.start_annotating();
        draw_line(&mut session, "red");
        assert!(session.stop_annotating().is_err());

        assert_eq!(session.mode(), Mode::Annotating);
        assert_eq!(session.canvas().strokes().len(), 1);
    }

    #[test]
    fn test_existing_meta_is_loaded_and_normalized() {
        let tmp = tempfile::tempdir().unwrap();
        let store = AnnotationStore::new(tmp.path().join("weld1_annotations"));
        store.put_meta(&MetaRecord::new("Plate 9", "Plug")).unwrap();

        let session = open_session(&tmp);
        assert_eq!(session.meta(), &MetaRecord::new("Plate 9", "Other"));
    }

    #[test]
    fn test_malformed_meta_does_not_block_open() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("weld1_annotations");
        let store = AnnotationStore::new(dir.clone());
        store
            .put(&crate::models::annotation::AnnotationRecord::new(10, "spatter", Vec::new()))
            .unwrap();
        std::fs::write(dir.join(META_FILE_NAME), "{ truncated").unwrap();

        let session = open_session(&tmp);
        assert_eq!(session.records().len(), 1);
        assert_eq!(session.records()[0].timestamp, 10);
        assert_eq!(session.meta(), &MetaRecord::new("", "Other"));
    }

    #[test]
    fn test_unreadable_meta_location_still_fails_open() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("weld1_annotations");
        // A directory where meta.json should be cannot be read as a file.
        std::fs::create_dir_all(dir.join(META_FILE_NAME)).unwrap();

        let video = VideoSelection::from_video_path(tmp.path().join("weld1.mp4"));
        let result = Session::open(video, Box::new(VideoClock::new(None)), &weld_types());
        assert!(matches!(result, Err(StoreError::Read { .. })));
    }

    #[test]
    fn test_pointer_leave_ends_stroke() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = open_session(&tmp);
        session.start_annotating();

        session.pointer_down("red", Point::new(1.0, 1.0));
        session.pointer_leave();
        session.pointer_move(Point::new(8.0, 8.0));

        assert_eq!(session.mode(), Mode::Annotating);
        assert_eq!(session.canvas().strokes().len(), 1);
        assert_eq!(session.canvas().strokes()[0].points, vec![Point::new(1.0, 1.0)]);
        assert!(!session.canvas().is_drawing());
    }

    #[test]
    fn test_listing_failure_after_change_keeps_old_listing() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = open_session(&tmp);
        session.playback_mut().seek_ms(700);
        session.start_annotating();
        draw_line(&mut session, "red");
        session.stop_annotating().unwrap();
        assert_eq!(session.records().len(), 1);

        // Replace the directory with a file so it can no longer be listed.
        let dir = session.video().annotation_dir.clone();
        std::fs::remove_dir_all(&dir).unwrap();
        std::fs::write(&dir, "occupied").unwrap();
        assert!(session.refresh().is_err());

        session.refresh_after_change();
        assert_eq!(session.records().len(), 1);
        assert_eq!(session.records()[0].timestamp, 700);
    }

    #[test]
    fn test_save_meta() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = open_session(&tmp);
        session.meta_mut().title = "A".into();
        session.save_meta().unwrap();
        session.meta_mut().title = "B".into();
        session.meta_mut().weld_type = "Butt".into();
        session.save_meta().unwrap();

        let store = AnnotationStore::new(session.video().annotation_dir.clone());
        assert_eq!(store.get_meta().unwrap(), MetaRecord::new("B", "Butt"));
    }
}
