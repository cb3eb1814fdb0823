//! Change notifications derived from the watch stream
//!
//! The watcher folds ADDED and MODIFIED into a single apply event. Tracking
//! which UIDs have been seen restores the create/update distinction.

use std::collections::{HashMap, HashSet};

use kube::{runtime::watcher, Resource, ResourceExt};

/// A change notification about a watched object
#[derive(Clone, Debug, PartialEq)]
pub enum Notification<K> {
    Create(K),
    Update(K),
    Delete(K),
    /// An object whose identity cannot be tracked
    Generic(K),
}

impl<K> Notification<K> {
    pub fn object(&self) -> &K {
        match self {
            Notification::Create(obj)
            | Notification::Update(obj)
            | Notification::Delete(obj)
            | Notification::Generic(obj) => obj,
        }
    }

    pub fn into_object(self) -> K {
        match self {
            Notification::Create(obj)
            | Notification::Update(obj)
            | Notification::Delete(obj)
            | Notification::Generic(obj) => obj,
        }
    }
}

/// Classifies watcher events into notifications
pub struct NotificationClassifier<K> {
    known: HashMap<String, K>,
    relisted: Option<HashSet<String>>,
}

impl<K> Default for NotificationClassifier<K> {
    fn default() -> Self {
        Self {
            known: HashMap::new(),
            relisted: None,
        }
    }
}

impl<K> NotificationClassifier<K>
where
    K: Resource + Clone,
{
    pub fn classify(&mut self, event: watcher::Event<K>) -> Vec<Notification<K>> {
        match event {
            watcher::Event::Init => {
                self.relisted = Some(HashSet::new());
                Vec::new()
            }
            watcher::Event::InitApply(obj) => {
                if let (Some(relisted), Some(uid)) = (self.relisted.as_mut(), obj.uid()) {
                    relisted.insert(uid);
                }
                vec![self.apply(obj)]
            }
            watcher::Event::InitDone => {
                let Some(relisted) = self.relisted.take() else {
                    return Vec::new();
                };
                let gone: Vec<String> = self
                    .known
                    .keys()
                    .filter(|uid| !relisted.contains(*uid))
                    .cloned()
                    .collect();
                gone.iter()
                    .filter_map(|uid| self.known.remove(uid))
                    .map(Notification::Delete)
                    .collect()
            }
            watcher::Event::Apply(obj) => vec![self.apply(obj)],
            watcher::Event::Delete(obj) => {
                if let Some(uid) = obj.uid() {
                    self.known.remove(&uid);
                }
                vec![Notification::Delete(obj)]
            }
        }
    }

    fn apply(&mut self, obj: K) -> Notification<K> {
        let Some(uid) = obj.uid() else {
            return Notification::Generic(obj);
        };
        match self.known.insert(uid, obj.clone()) {
            None => Notification::Create(obj),
            Some(_) => Notification::Update(obj),
        }
    }
}
