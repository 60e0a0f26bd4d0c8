

use std::thread;

use fixtures::Session;

use crate::sync::CountingGate;

fn init_tracing() {
    #[cfg(feature = "rwgate_tracing")]
    crate::rwgate_tracing::init();
}

#[test]
fn integration_readers_share_up_to_capacity() {
    init_tracing();
    let gate = CountingGate::new(3).unwrap();
    thread::scope(|s| {
        let readers: Vec<Session> = (0..3).map(|_| Session::reader(s, &gate)).collect();
        for reader in &readers {
            assert_entered!(reader);
        }
        assert_eq!(gate.available(), 0);

        let extra = Session::reader(s, &gate);
        assert_blocked!(extra);

        readers[1].leave();
        assert_entered!(extra);
        extra.leave();
    });
    assert_eq!(gate.available(), 3);
}

#[test]
fn integration_writer_blocks_readers_and_writers() {
    init_tracing();
    let gate = CountingGate::new(4).unwrap();
    thread::scope(|s| {
        let writer = Session::writer(s, &gate);
        assert_entered!(writer);

        let reader = Session::reader(s, &gate);
        let other_writer = Session::writer(s, &gate);
        assert_blocked!(reader);
        assert_blocked!(other_writer);

        writer.leave();
        // Whoever wins next, the other is kept out until it leaves
        if fixtures::first_to_enter(&reader, &other_writer) {
            assert_blocked!(other_writer);
            reader.leave();
            assert_entered!(other_writer);
            other_writer.leave();
        } else {
            assert_blocked!(reader);
            other_writer.leave();
            assert_entered!(reader);
            reader.leave();
        }
    });
    assert_eq!(gate.available(), 4);
}

#[test]
fn integration_no_permit_leak_after_handles_dropped() {
    init_tracing();
    let gate = CountingGate::new(5).unwrap();
    thread::scope(|s| {
        for i in 0..10 {
            let gate = &gate;
            s.spawn(move || {
                if i % 3 == 0 {
                    let writer = gate.writer();
                    writer.write_occupy();
                    // dropped while holding
                } else {
                    let reader = gate.reader();
                    reader.read_occupy();
                    if i % 2 == 0 {
                        reader.read_release();
                    }
                }
            });
        }
    });
    assert_eq!(gate.available(), 5);
}
