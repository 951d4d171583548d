use std::time::Duration;

/// The four causal steps of a run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Script,
    Enhance,
    Assemble,
    Upload,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Script, Stage::Enhance, Stage::Assemble, Stage::Upload];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Script => "script",
            Stage::Enhance => "enhance",
            Stage::Assemble => "assemble",
            Stage::Upload => "upload",
        }
    }

    pub fn start_message(self) -> &'static str {
        match self {
            Stage::Script => "🤖 Generating initial script with AI...",
            Stage::Enhance => "✨ Enhancing script with advanced AI...",
            Stage::Assemble => "🎬 Creating video with voiceover and visuals...",
            Stage::Upload => "📤 Uploading video to YouTube...",
        }
    }

    pub fn done_message(self) -> &'static str {
        match self {
            Stage::Script => "✅ Script generated successfully",
            Stage::Enhance => "✅ Script enhanced with storytelling improvements",
            Stage::Assemble => "✅ Video generated successfully",
            Stage::Upload => "✅ Video posted to YouTube!",
        }
    }

    /// Simulated work time shown between the start and done messages.
    pub fn pacing(self) -> Duration {
        match self {
            Stage::Script | Stage::Enhance => Duration::from_millis(1000),
            Stage::Assemble | Stage::Upload => Duration::from_millis(1500),
        }
    }

    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Script => Some(Stage::Enhance),
            Stage::Enhance => Some(Stage::Assemble),
            Stage::Assemble => Some(Stage::Upload),
            Stage::Upload => None,
        }
    }
}

/// Lifecycle of one run. `Completed` and `Errored` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Running(Stage),
    Done(Stage),
    Completed,
    Errored,
}

impl PipelineState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Completed | PipelineState::Errored)
    }

    /// Whether `stage` may start from this state.
    pub fn can_start(self, stage: Stage) -> bool {
        match self {
            PipelineState::Idle => stage == Stage::Script,
            PipelineState::Done(prev) => prev.next() == Some(stage),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_chain_in_order() {
        let mut chain = vec![Stage::Script];
        while let Some(next) = chain.last().and_then(|s| s.next()) {
            chain.push(next);
        }
        assert_eq!(chain, Stage::ALL.to_vec());
    }

    #[test]
    fn only_the_next_stage_may_start() {
        assert!(PipelineState::Idle.can_start(Stage::Script));
        assert!(!PipelineState::Idle.can_start(Stage::Enhance));
        assert!(PipelineState::Done(Stage::Enhance).can_start(Stage::Assemble));
        assert!(!PipelineState::Running(Stage::Script).can_start(Stage::Enhance));
        assert!(!PipelineState::Errored.can_start(Stage::Script));
    }

    #[test]
    fn total_pacing_matches_demo_timing() {
        let total: Duration = Stage::ALL.iter().map(|s| s.pacing()).sum();
        assert_eq!(total, Duration::from_millis(5000));
    }
}
