use super::*;

const U: Dialect = Dialect::UNIX;
const W: Dialect = Dialect::WINDOWS;

#[test]
fn clean_posix() {
    assert_eq!(clean(U, "abc"), "abc");
    assert_eq!(clean(U, "abc/def"), "abc/def");
    assert_eq!(clean(U, "a/b/c"), "a/b/c");
    assert_eq!(clean(U, "abc//def//ghi"), "abc/def/ghi");
    assert_eq!(clean(U, "abc/./def"), "abc/def");
    assert_eq!(clean(U, "/./abc/def"), "/abc/def");
    assert_eq!(clean(U, "abc/def/.."), "abc");
    assert_eq!(clean(U, "abc/def/../ghi/.."), "abc");
    assert_eq!(clean(U, "abc/.."), ".");
    assert_eq!(clean(U, "/abc/.."), "/");
    assert_eq!(clean(U, ".."), "..");
    assert_eq!(clean(U, "../.."), "../..");
    assert_eq!(clean(U, "../../abc"), "../../abc");
    assert_eq!(clean(U, "/.."), "/");
    assert_eq!(clean(U, "/../abc"), "/abc");
    assert_eq!(clean(U, ""), ".");
    assert_eq!(clean(U, "/"), "/");
    assert_eq!(clean(U, "abc/"), "abc");
}

#[test]
fn clean_is_idempotent() {
    for p in [
        "a/b/../c//./d",
        "../../x",
        "/..//a/./b/..",
        "",
        ".",
        "/",
        "a//",
    ] {
        let once = clean(U, p);
        assert_eq!(clean(U, &once), once, "clean not idempotent for {p:?}");
    }
}

#[test]
fn clean_windows() {
    assert_eq!(clean(W, "c:"), "c:.");
    assert_eq!(clean(W, "c:\\"), "c:\\");
    assert_eq!(clean(W, "c:\\abc"), "c:\\abc");
    assert_eq!(clean(W, "c:abc\\..\\..\\.."), "c:..\\..");
    assert_eq!(clean(W, "c:\\abc\\def\\..\\.."), "c:\\");
    assert_eq!(clean(W, "/abc/def"), "\\abc\\def");
    assert_eq!(clean(W, "\\\\server\\share\\..\\x"), "\\\\server\\share\\x");
}

#[test]
fn volume_names() {
    assert_eq!(volume_name_len(U, "/a/b"), 0);
    assert_eq!(volume_name_len(W, "C:\\a"), 2);
    assert_eq!(volume_name_len(W, "C:a"), 2);
    assert_eq!(volume_name_len(W, "\\\\server\\share\\x"), 14);
    assert_eq!(volume_name_len(W, "\\a\\b"), 0);
}

#[test]
fn absolute_paths() {
    assert!(is_abs(U, "/a"));
    assert!(!is_abs(U, "a/b"));
    assert!(is_abs(W, "C:\\a"));
    assert!(!is_abs(W, "C:a"));
    assert!(is_abs(W, "\\\\server\\share"));
    assert!(!is_abs(W, "abc"));
}

#[test]
fn reserved_device_names_are_absolute() {
    assert!(is_abs(W, "NUL"));
    assert!(is_abs(W, "con"));
    assert!(is_abs(W, "COM1"));
    assert!(is_abs(W, "lpt9"));
    assert!(!is_abs(W, "COM10"));
    assert!(!is_abs(U, "NUL"));
}

#[test]
fn join_posix() {
    assert_eq!(join(U, &["a", "b"]), "a/b");
    assert_eq!(join(U, &["a", ""]), "a");
    assert_eq!(join(U, &["", "b"]), "b");
    assert_eq!(join(U, &["/", "a/b", "../c"]), "/a/c");
    assert_eq!(join(U, &[]), "");
}

#[test]
fn join_does_not_create_unc_paths() {
    assert_eq!(join(W, &["\\", "a", "b"]), "\\a\\b");
    assert_eq!(join(W, &["\\", "\\a", "b"]), "\\a\\b");
    assert_eq!(join(W, &["\\\\server\\share", "x"]), "\\\\server\\share\\x");
}

#[test]
fn join_drive_relative() {
    // A bare drive letter stays drive-relative
    assert_eq!(join(W, &["C:", "a"]), "C:a");
    assert_eq!(join(W, &["C:\\", "a"]), "C:\\a");
}

#[test]
fn dir_base_ext() {
    assert_eq!(dir(U, "/a/b/c"), "/a/b");
    assert_eq!(dir(U, "a"), ".");
    assert_eq!(dir(U, "/a"), "/");
    assert_eq!(base(U, "/a/b/c.js"), "c.js");
    assert_eq!(base(U, "/a/b/"), "b");
    assert_eq!(base(U, "/"), "/");
    assert_eq!(base(U, ""), ".");
    assert_eq!(ext(U, "/a/b.min.js"), ".js");
    assert_eq!(ext(U, "/a/b"), "");
    assert_eq!(ext(U, "/a.dir/b"), "");
}

#[test]
fn join_dir_base_recovers_path() {
    for p in ["/a/b/c", "x/y", "/q"] {
        let joined = join(U, &[&dir(U, p), &base(U, p)]);
        assert_eq!(joined, clean(U, p));
    }
}

#[test]
fn rel_posix() {
    assert_eq!(rel(U, "/a", "/a").unwrap(), ".");
    assert_eq!(rel(U, "/a", "/a/b/c").unwrap(), "b/c");
    assert_eq!(rel(U, "/a/b", "/a/c").unwrap(), "../c");
    assert_eq!(rel(U, "/a/b/c", "/a").unwrap(), "../..");
    assert_eq!(rel(U, "a/b", "a/b/c/d").unwrap(), "c/d");
    assert!(rel(U, "/a", "b").is_err());
    assert!(rel(U, "a", "/b").is_err());
    assert!(rel(U, "..", "a").is_err());
}

#[test]
fn rel_windows_volumes() {
    assert!(rel(W, "C:\\a", "D:\\a").is_err());
    assert!(rel(W, "C:\\a\\b", "D:\\a\\b").is_err());
    assert_eq!(rel(W, "\\a\\b", "\\a\\b\\c").unwrap(), "c");
    assert_eq!(rel(W, "C:\\a", "c:\\a\\b").unwrap(), "b");
}

#[test]
fn rel_round_trip() {
    // clean(join(base, rel(base, target))) == clean(target)
    for (b, t) in [
        ("/a/b", "/a/c/d"),
        ("/x", "/x/y"),
        ("/p/q/r", "/p"),
        ("m/n", "m/o"),
    ] {
        let r = rel(U, b, t).unwrap();
        assert_eq!(clean(U, &join(U, &[b, &r])), clean(U, t), "base={b} targ={t}");
    }
}

#[test]
fn windows_comparisons_are_case_insensitive() {
    assert_eq!(rel(W, "C:\\Users\\Foo", "C:\\users\\foo\\x").unwrap(), "x");
}
