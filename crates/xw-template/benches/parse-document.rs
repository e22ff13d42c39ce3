use xw_template::{Parser, ParserOptions};

fn main() {
    divan::main();
}

const DOCUMENT: &str = include_str!("fixtures/sample.xw");

#[divan::bench]
fn bench_parse_buffered(bencher: divan::Bencher) {
    bencher.bench(|| {
        let options = ParserOptions::<()>::new(true);
        let mut parser = Parser::new(options);
        parser.parse(DOCUMENT.as_bytes(), &mut ())
    });
}

#[divan::bench]
fn bench_parse_unbuffered(bencher: divan::Bencher) {
    bencher.bench(|| {
        let options = ParserOptions::<()>::new(false);
        let mut parser = Parser::new(options);
        parser.parse(DOCUMENT.as_bytes(), &mut ())
    });
}
