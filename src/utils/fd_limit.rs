//! Reader pool cap from the process file descriptor limit (Unix).

/// A reader holds exactly one open file at a time.
pub const FDS_PER_READER: usize = 1;

/// Descriptors kept back for the host and the walk: stdio, log output, open directory handles.
pub const RESERVED_FDS: u64 = 64;

/// Fraction of what remains after the reserve that readers may use.
const FD_LIMIT_FRACTION: f64 = 0.8;

/// Soft limit on open file descriptors, or `None` when unlimited or unavailable (e.g. Windows).
#[cfg(unix)]
pub fn max_open_fds() -> Option<u64> {
    let mut rlim = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };
    if unsafe { libc::getrlimit(libc::RLIMIT_NOFILE, &mut rlim) } != 0 {
        return None;
    }
    match rlim.rlim_cur {
        libc::RLIM_INFINITY => None,
        cur if cur > i64::MAX as u64 => None,
        cur => Some(cur),
    }
}

#[cfg(not(unix))]
pub fn max_open_fds() -> Option<u64> {
    None
}

/// Readers that fit under `limit` once the reserve is taken out. Always at least one.
pub fn readers_for_fd_limit(limit: u64) -> usize {
    let usable = (limit.saturating_sub(RESERVED_FDS) as f64 * FD_LIMIT_FRACTION) as usize;
    (usable / FDS_PER_READER).max(1)
}

/// Reader pool cap for this process, or `None` when there is no limit to respect.
pub fn max_readers_by_fd_limit() -> Option<usize> {
    max_open_fds().map(readers_for_fd_limit)
}
