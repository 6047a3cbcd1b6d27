use fit_core::{
    derive_spec, fit_local, validate_upload, FitConfig, MediaError, RuleSource, ValidationReport,
};

use crate::remote::{RemoteClient, RemoteError};

/// どちらの経路で処理したか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Server,
    Local,
}

/// 処理の依頼内容
#[derive(Debug)]
pub struct Job<'a> {
    pub data: Vec<u8>,
    pub preset: Option<&'a str>,
    pub rule: Option<&'a str>,
    pub config: FitConfig,
}

#[derive(Debug)]
pub struct FitOutcome {
    pub bytes: Vec<u8>,
    pub report: ValidationReport,
    pub route: Route,
}

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// サーバーで処理し、到達できなければローカルで処理する
///
/// 入力不正（サーバーが 4xx を返した場合も含む）とサーバー側のエンコード失敗は
/// 切り替えずにそのまま返す。
pub fn run_with_fallback(server: Option<&RemoteClient>, job: Job<'_>) -> Result<FitOutcome, JobError> {
    // 入力不正はどの経路でも処理前に拒否する
    let source_format = validate_upload(None, &job.data)?;

    let Some(client) = server else {
        return run_local(job);
    };

    match client.process(
        job.data.clone(),
        source_format.content_type(),
        job.preset,
        job.rule,
    ) {
        Ok(result) => Ok(FitOutcome {
            bytes: result.bytes,
            report: result.report,
            route: Route::Server,
        }),
        Err(RemoteError::Unavailable(reason)) => {
            eprintln!("warning: server unavailable ({reason}); processing locally instead");
            tracing::warn!(reason = %reason, "falling back to local processing");
            run_local(job)
        }
        Err(e) => Err(e.into()),
    }
}

/// ローカル経路（同じ Spec と同じ品質探索を使う）
pub fn run_local(job: Job<'_>) -> Result<FitOutcome, JobError> {
    let spec = derive_spec(RuleSource::from_request(job.preset, job.rule)).map_err(MediaError::from)?;
    let result = fit_local(&job.data, &spec, &job.config).map_err(MediaError::from)?;
    let report = ValidationReport::from(&result);

    Ok(FitOutcome {
        bytes: result.bytes,
        report,
        route: Route::Local,
    })
}
