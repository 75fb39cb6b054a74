use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: OffsetDateTime,
    pub action: String,
}

/// Append-only record of user-visible activity, oldest first.
#[derive(Debug, Default, Clone)]
pub struct ActivityLog {
    entries: Vec<LogEntry>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append<A: Into<String>>(&mut self, timestamp: OffsetDateTime, action: A) {
        self.entries.push(LogEntry {
            timestamp,
            action: action.into(),
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::ActivityLog;
    use time::macros::datetime;

    #[test]
    fn append_keeps_insertion_order() {
        let mut log = ActivityLog::new();
        log.append(datetime!(2025-12-20 09:00:02 UTC), "second stamp first");
        log.append(datetime!(2025-12-20 09:00:01 UTC), "earlier stamp later");

        let actions: Vec<_> = log.iter().map(|entry| entry.action.as_str()).collect();
        assert_eq!(actions, vec!["second stamp first", "earlier stamp later"]);
        assert_eq!(log.len(), 2);
    }
}
