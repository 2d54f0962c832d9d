/// Build the content written for a conflicted file.
///
/// Either side may be empty when that side deleted the file. Contents are
/// inserted verbatim; no newline is added after them.
pub fn conflict_markers(current: &[u8], given: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(current.len() + given.len() + 32);
    out.extend_from_slice(b"<<<<<<< HEAD\n");
    out.extend_from_slice(current);
    out.extend_from_slice(b"=======\n");
    out.extend_from_slice(given);
    out.extend_from_slice(b">>>>>>>\n");
    out
}
