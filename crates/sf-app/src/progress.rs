#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudyKind {
    Staging,
    Eps,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudyStage {
    SolvingPoint,
    SolvingBatch,
    Validating,
    ComputingEnergy,
    ComparingVfd,
    RunningEps,
    CompressingEvents,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointProgress {
    /// 1-based position in the batch.
    pub index: usize,
    pub total: usize,
    pub phi_pct: u32,
    pub n_pumps: usize,
}

#[derive(Debug, Clone)]
pub struct StudyProgressEvent {
    pub kind: StudyKind,
    pub stage: StudyStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
    pub point: Option<PointProgress>,
}

impl StudyProgressEvent {
    pub fn stage(
        kind: StudyKind,
        stage: StudyStage,
        elapsed_wall_s: f64,
        message: Option<String>,
    ) -> Self {
        Self {
            kind,
            stage,
            elapsed_wall_s,
            message,
            point: None,
        }
    }
}
