use crate::api_client::ApiClient;
use crate::editor::EditorSurface;
use crate::types::{NotePayload, NoteSummary, SaveNoteRequest};

/// Note list + open-note state bound to server persistence.
///
/// Create, save and delete each carry their own busy flag so an
/// outstanding request suppresses duplicate submissions of the same kind.
/// Navigating away bumps an epoch; completions started under an older
/// epoch drop their UI updates instead of applying them to the wrong view.
pub struct NoteWorkspace {
    api: ApiClient,
    notes: Vec<NoteSummary>,
    current: Option<NotePayload>,
    creating: bool,
    saving: bool,
    deleting: bool,
    epoch: u64,
}

impl NoteWorkspace {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            notes: Vec::new(),
            current: None,
            creating: false,
            saving: false,
            deleting: false,
            epoch: 0,
        }
    }

    pub fn notes(&self) -> &[NoteSummary] {
        &self.notes
    }

    pub fn current(&self) -> Option<&NotePayload> {
        self.current.as_ref()
    }

    pub fn is_creating(&self) -> bool {
        self.creating
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    /// Leave the current note view. Returns the new epoch; completions
    /// holding an older one must not touch the state.
    pub fn navigate(&mut self) -> u64 {
        self.epoch += 1;
        self.current = None;
        self.epoch
    }

    fn still_current(&self, epoch: u64) -> bool {
        self.epoch == epoch
    }

    pub async fn refresh_list(&mut self) -> Result<(), String> {
        let epoch = self.epoch;
        let notes = self.api.list_notes().await?;
        if self.still_current(epoch) {
            self.notes = notes;
        }
        Ok(())
    }

    /// Open a note, loading its content into view.
    pub async fn open(&mut self, uid: &str) -> Result<(), String> {
        let epoch = self.navigate();
        let note = self.api.get_note(uid).await?;
        if self.still_current(epoch) {
            self.current = Some(note);
        }
        Ok(())
    }

    /// Create an empty note and open it. Returns its uid, or `None` when a
    /// create is already in flight.
    pub async fn create(&mut self) -> Result<Option<String>, String> {
        if self.creating {
            return Ok(None);
        }
        let epoch = self.epoch;
        self.creating = true;
        let result = self.api.create_note().await;
        self.creating = false;

        Ok(Some(self.apply_created(epoch, result?)))
    }

    /// Completion of a create: open the new note unless the view moved on
    /// while the request was in flight. The note exists server-side either
    /// way, so its uid is still reported.
    fn apply_created(&mut self, epoch: u64, note: NotePayload) -> String {
        let uid = note.uid.clone();
        if self.still_current(epoch) {
            self.navigate();
            self.current = Some(note);
        }
        uid
    }

    /// Save the editor's content to the open note. Returns `false` when
    /// there is nothing to save or a save is already in flight.
    pub async fn save(&mut self, editor: &impl EditorSurface) -> Result<bool, String> {
        if self.saving {
            return Ok(false);
        }
        let Some(current) = &self.current else {
            return Ok(false);
        };

        let uid = current.uid.clone();
        let content = editor.value();
        let title = editor.plain_text();
        let epoch = self.epoch;

        self.saving = true;
        let result = self
            .api
            .save_note(&SaveNoteRequest {
                uid: uid.clone(),
                title: Some(title),
                content: content.clone(),
            })
            .await;
        self.saving = false;
        result?;

        // The write fully replaced the stored content.
        if self.still_current(epoch) {
            if let Some(note) = &mut self.current {
                if note.uid == uid {
                    note.content = content;
                }
            }
        }
        Ok(true)
    }

    /// Delete the open note and leave its view. Returns `false` when there
    /// is nothing to delete or a delete is already in flight.
    pub async fn delete(&mut self) -> Result<bool, String> {
        if self.deleting {
            return Ok(false);
        }
        let Some(current) = &self.current else {
            return Ok(false);
        };

        let uid = current.uid.clone();
        self.deleting = true;
        let result = self.api.delete_note(&uid).await;
        self.deleting = false;
        result?;

        self.navigate();
        self.notes.retain(|note| note.uid != uid);
        Ok(true)
    }
}
