use std::io::{Cursor, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use cycframe::channel::read_response;
use cycframe::{Channel, Client, CycError, Database, Settings, TcpChannel, Value};

fn respond(bytes: &[u8]) -> cycframe::Result<String> {
    read_response(&mut Cursor::new(bytes.to_vec()))
}

#[test]
fn length_framed_responses_are_read_exactly() {
    assert_eq!(respond(b"L0000000005hello").unwrap(), "hello");
    assert_eq!(respond(b"L         4true").unwrap(), "true");
    // trailing bytes are not part of the answer
    assert_eq!(respond(b"L0000000002[]garbage").unwrap(), "[]");
}

#[test]
fn unsized_responses_run_to_the_end() {
    assert_eq!(respond(b"A[1, 2]").unwrap(), "[1, 2]");
    // no marker: the first byte belongs to the payload
    assert_eq!(respond(b"[1, 2]").unwrap(), "[1, 2]");
    assert_eq!(respond(b"t").unwrap(), "t");
}

#[test]
fn broken_responses_are_transport_errors() {
    for bytes in [
        &b""[..],
        b"L0000000010short",
        b"Lxxxxxxxxxx[]",
        b"L00000",
        b"A",
        b"A \r\n",
        b"L0000000000",
    ] {
        assert!(
            matches!(respond(bytes), Err(CycError::Transport(_))),
            "{:?} should fail",
            String::from_utf8_lossy(bytes)
        );
    }
    assert!(matches!(respond(b"L0000000002\xff\xfe"), Err(CycError::Decode { .. })));
}

// ------------- a stand-in engine on a socket -------------
fn read_request(stream: &mut TcpStream) -> String {
    let mut bytes = Vec::new();
    let mut depth = 0;
    let mut byte = [0u8; 1];
    loop {
        stream.read_exact(&mut byte).unwrap();
        bytes.push(byte[0]);
        match byte[0] {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            _ => {}
        }
    }
    String::from_utf8(bytes).unwrap()
}

/// Serves one connection per answer, in order; returns the requests it saw.
fn serve(answers: Vec<&'static str>) -> (u16, thread::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for answer in answers {
            let (mut stream, _) = listener.accept().unwrap();
            seen.push(read_request(&mut stream));
            stream.write_all(answer.as_bytes()).unwrap();
        }
        seen
    });
    (port, handle)
}

#[test]
fn database_over_tcp() {
    let (port, engine) = serve(vec![
        "L0000000004true",
        r#"A["|EG10001|"]"#,
        r#"["L-tryptophan"]"#,
    ]);
    let channel = TcpChannel::new("127.0.0.1", port, Duration::from_secs(10)).unwrap();
    let db = Database::open("ecoli", channel).unwrap();

    let genes = db.genes_of_reaction("RXN-1").unwrap();
    assert_eq!(genes, Value::Sequence(vec![Value::symbol("EG10001")]));
    let names = db.resolve("TRP").unwrap().slot("common-name").unwrap();
    assert_eq!(names, Value::Sequence(vec![Value::from("L-tryptophan")]));

    assert_eq!(
        engine.join().unwrap(),
        vec![
            "(orgid-exist-p 'ECOLI)",
            "(with-organism (:org-id 'ECOLI) (genes-of-reaction 'RXN-1))",
            "(with-organism (:org-id 'ECOLI) (get-slot-values 'TRP 'COMMON-NAME))",
        ]
    );
}

#[test]
fn client_connects_from_settings() {
    let (port, engine) = serve(vec![r#"L0000000016["|ECOLI|", "X"]"#]);
    let settings = Settings::default()
        .with_host("127.0.0.1")
        .with_port(port)
        .with_timeout(Duration::from_secs(10));
    let client = Client::connect(&settings).unwrap();
    assert_eq!(client.all_orgids().unwrap(), vec!["ECOLI", "X"]);
    assert_eq!(engine.join().unwrap(), vec!["(all-orgids)"]);
}

#[test]
fn unreachable_engine_is_a_transport_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let mut channel = TcpChannel::new("127.0.0.1", port, Duration::from_secs(2)).unwrap();
    let err = channel.exchange("(all-orgids)").unwrap_err();
    assert!(matches!(err, CycError::Transport(ref m) if m.contains("127.0.0.1")));
}
