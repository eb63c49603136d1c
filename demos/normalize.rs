fn main() {
    let source = "H<sub>2</sub>O, v<sub>x</sub>, x<0xE2><0x81><0xAF> and <0xE2><0x82><0x99>";
    let result = glyphfix::normalize(source);
    println!("{}", source);
    println!("{}", result);
}
